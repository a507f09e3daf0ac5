//! User directory interface consumed by request authentication.
use async_trait::async_trait;
use thiserror::Error;

/// Resolved account record for an authenticated subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn new<I, S>(username: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user not found: {0}")]
    NotFound(String),

    #[error("user directory backend error: {0}")]
    Backend(String),
}

/// Account lookup by name.
///
/// Implementations must be shareable across requests (`Arc<dyn UserDirectory>`).
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    // Returns NotFound when `username` does not resolve to a known account.
    async fn load_user_by_name(&self, username: &str) -> Result<Principal, DirectoryError>;
}
