/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Clone is cheap (Arc inside); nothing here is mutated after startup
 */
use std::sync::Arc;

use crate::services::auth::{ExemptPathSet, RequestAuthenticator, TokenCodec};
use crate::services::users::UserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub users: Arc<dyn UserDirectory>,
    pub authenticator: RequestAuthenticator,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("authenticator", &self.authenticator)
            .finish()
    }
}

impl AppState {
    pub fn new(
        tokens: Arc<TokenCodec>,
        users: Arc<dyn UserDirectory>,
        exempt_paths: ExemptPathSet,
    ) -> Self {
        let authenticator =
            RequestAuthenticator::new(tokens.clone(), users.clone(), Arc::new(exempt_paths));
        Self {
            tokens,
            users,
            authenticator,
        }
    }
}
