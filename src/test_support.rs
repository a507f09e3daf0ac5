//! Shared fixtures for in-crate tests.
use std::sync::Arc;

use crate::services::auth::{ExemptPathSet, TokenCodec};
use crate::services::users::{InMemoryUserDirectory, Principal};
use crate::state::AppState;

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";

pub fn codec() -> TokenCodec {
    TokenCodec::new(SECRET).unwrap()
}

/// `alice` is a plain user, `root` also holds ROLE_ADMIN.
pub fn state() -> AppState {
    let users = InMemoryUserDirectory::new([
        Principal::new("alice", ["ROLE_USER"]),
        Principal::new("root", ["ROLE_USER", "ROLE_ADMIN"]),
    ]);
    AppState::new(
        Arc::new(codec()),
        Arc::new(users),
        ExemptPathSet::default(),
    )
}
