use crate::services::users::Principal;

/// Identity installed into request extensions after a token is accepted.
///
/// Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub principal: Principal,
    pub authorities: Vec<String>,
}

impl AuthenticatedIdentity {
    pub fn new(principal: Principal) -> Self {
        let authorities = principal.authorities.clone();
        Self {
            principal,
            authorities,
        }
    }

    pub fn username(&self) -> &str {
        &self.principal.username
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}
