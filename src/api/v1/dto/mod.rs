pub mod me;
pub mod token;
