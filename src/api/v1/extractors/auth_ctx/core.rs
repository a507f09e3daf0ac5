use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthenticatedIdentity;

/// Handler-side view of the authenticated identity.
///
/// The access middleware inserts `AuthenticatedIdentity` into request
/// extensions. When it is missing (anonymous request) the handler is not
/// called and the client gets 401.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedIdentity);

impl Authenticated {
    pub fn require_authority(&self, authority: &str) -> Result<&AuthenticatedIdentity, AppError> {
        if self.0.has_authority(authority) {
            Ok(&self.0)
        } else {
            tracing::debug!(user = %self.0.username(), authority, "access denied");
            Err(AppError::Forbidden)
        }
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(Authenticated)
            .ok_or(AppError::Unauthorized)
    }
}
