use std::sync::Arc;

use axum::http::{HeaderMap, header};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::services::auth::error::TokenError;
use crate::services::auth::exempt::ExemptPathSet;
use crate::services::auth::identity::AuthenticatedIdentity;
use crate::services::auth::token_codec::TokenCodec;
use crate::services::users::{DirectoryError, UserDirectory};

/// Terminal authentication failures for one request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Token(#[from] TokenError),

    // Valid token but the subject no longer resolves.
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user directory unavailable: {0}")]
    Directory(String),
}

impl From<DirectoryError> for AuthError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::NotFound(name) => AuthError::UserNotFound(name),
            DirectoryError::Backend(msg) => AuthError::Directory(msg),
        }
    }
}

/// Non-error outcomes; every variant lets the request continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Path is on the allowlist; nothing was inspected.
    Exempt,
    /// No `Authorization` header; downstream decides whether anonymous is enough.
    Anonymous,
    Authenticated(AuthenticatedIdentity),
}

/// Per-request authentication decision, independent of the HTTP framework.
#[derive(Clone)]
pub struct RequestAuthenticator {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserDirectory>,
    exempt: Arc<ExemptPathSet>,
}

impl std::fmt::Debug for RequestAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuthenticator")
            .field("exempt", &self.exempt)
            .finish()
    }
}

impl RequestAuthenticator {
    pub fn new(
        codec: Arc<TokenCodec>,
        users: Arc<dyn UserDirectory>,
        exempt: Arc<ExemptPathSet>,
    ) -> Self {
        Self {
            codec,
            users,
            exempt,
        }
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt.matches(path)
    }

    pub async fn authenticate(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<AuthOutcome, AuthError> {
        if self.is_exempt(path) {
            debug!(path, "exempt path, skipping authentication");
            return Ok(AuthOutcome::Exempt);
        }

        let Some(value) = headers.get(header::AUTHORIZATION) else {
            debug!(path, "no authorization header, continuing as anonymous");
            return Ok(AuthOutcome::Anonymous);
        };

        let raw = value.to_str().map_err(|_| {
            warn!(path, kind = TokenError::Malformed.code(), "unreadable authorization header");
            TokenError::Malformed
        })?;

        let token = TokenCodec::extract_bearer(Some(raw)).map_err(|err| {
            warn!(path, kind = err.code(), "authorization header is not a bearer credential");
            err
        })?;

        let subject = self.codec.subject_of(token).map_err(|err| {
            warn!(path, kind = err.code(), error = %err, "access token rejected");
            err
        })?;

        let principal = self
            .users
            .load_user_by_name(&subject)
            .await
            .map_err(|err| {
                match &err {
                    DirectoryError::NotFound(_) => {
                        warn!(path, subject = %subject, "token subject not found in directory")
                    }
                    DirectoryError::Backend(_) => {
                        error!(path, subject = %subject, error = %err, "user directory lookup failed")
                    }
                }
                AuthError::from(err)
            })?;

        debug!(path, user = %principal.username, "request authenticated");
        Ok(AuthOutcome::Authenticated(AuthenticatedIdentity::new(
            principal,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::clock::FixedClock;
    use crate::services::users::{InMemoryUserDirectory, Principal};
    use async_trait::async_trait;
    use axum::http::HeaderValue;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    struct BrokenDirectory;

    #[async_trait]
    impl UserDirectory for BrokenDirectory {
        async fn load_user_by_name(
            &self,
            _username: &str,
        ) -> Result<crate::services::users::Principal, DirectoryError> {
            Err(DirectoryError::Backend("connection refused".into()))
        }
    }

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(SECRET).unwrap())
    }

    fn authenticator_with(users: Arc<dyn UserDirectory>) -> RequestAuthenticator {
        RequestAuthenticator::new(codec(), users, Arc::new(ExemptPathSet::default()))
    }

    fn authenticator() -> RequestAuthenticator {
        let users = InMemoryUserDirectory::new([
            Principal::new("alice", ["ROLE_USER"]),
            Principal::new("root", ["ROLE_USER", "ROLE_ADMIN"]),
        ]);
        authenticator_with(Arc::new(users))
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn exempt_path_skips_everything() {
        let outcome = authenticator()
            .authenticate("/api/v1/auth/login", &bearer("garbage"))
            .await
            .unwrap();
        assert_eq!(outcome, AuthOutcome::Exempt);
    }

    #[tokio::test]
    async fn missing_header_is_anonymous() {
        let outcome = authenticator()
            .authenticate("/api/v1/todos", &HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(outcome, AuthOutcome::Anonymous);
    }

    fn raw_authorization(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[tokio::test]
    async fn other_schemes_are_rejected_as_malformed() {
        for value in ["Basic dXNlcjpwYXNz", "bearer abc.def.ghi", "Token eyJ.x.y", ""] {
            let err = authenticator()
                .authenticate("/api/v1/todos", &raw_authorization(value))
                .await
                .unwrap_err();
            assert!(
                matches!(err, AuthError::Token(TokenError::Malformed)),
                "header {value:?} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn empty_bearer_credential_is_missing_not_anonymous() {
        let err = authenticator()
            .authenticate("/api/v1/todos", &raw_authorization("Bearer "))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Token(TokenError::Missing)));
    }

    #[tokio::test]
    async fn valid_token_installs_identity() {
        let token = codec().issue_access_token("root").unwrap();

        let outcome = authenticator()
            .authenticate("/api/v1/todos", &bearer(&token))
            .await
            .unwrap();

        let AuthOutcome::Authenticated(identity) = outcome else {
            panic!("expected authenticated outcome, got {outcome:?}");
        };
        assert_eq!(identity.username(), "root");
        assert!(identity.has_authority("ROLE_ADMIN"));
        assert_eq!(identity.authorities, identity.principal.authorities);
    }

    #[tokio::test]
    async fn bad_tokens_are_terminal() {
        let expired = TokenCodec::new(SECRET)
            .unwrap()
            .with_clock(Arc::new(FixedClock(1_000)))
            .issue_access_token("alice")
            .unwrap();

        let err = authenticator()
            .authenticate("/api/v1/todos", &bearer(&expired))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Token(TokenError::Expired)));

        let err = authenticator()
            .authenticate("/api/v1/todos", &bearer("a.b"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Token(TokenError::Malformed)));
    }

    #[tokio::test]
    async fn unreadable_header_is_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );

        let err = authenticator()
            .authenticate("/api/v1/todos", &headers)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Token(TokenError::Malformed)));
    }

    #[tokio::test]
    async fn unknown_subject_is_user_not_found() {
        let token = codec().issue_access_token("ghost").unwrap();

        let err = authenticator()
            .authenticate("/api/v1/todos", &bearer(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn directory_failure_propagates() {
        let token = codec().issue_access_token("alice").unwrap();

        let err = authenticator_with(Arc::new(BrokenDirectory))
            .authenticate("/api/v1/todos", &bearer(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Directory(_)));
    }
}
