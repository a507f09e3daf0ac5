pub mod access;
pub mod access_denied;
