use serde::Serialize;

use crate::services::auth::AuthenticatedIdentity;

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub authorities: Vec<String>,
}

impl From<&AuthenticatedIdentity> for MeResponse {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self {
            username: identity.username().to_string(),
            authorities: identity.authorities.clone(),
        }
    }
}
