use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::services::auth::clock::{Clock, SystemClock};
use crate::services::auth::error::{CodecError, TokenError};

pub const ACCESS_TOKEN_TTL_SECONDS: i64 = 2 * 60 * 60;
pub const REFRESH_TOKEN_TTL_SECONDS: i64 = 3 * 24 * 60 * 60;

/// HS256 keys must be at least as long as the hash output.
pub const MIN_SECRET_BYTES: usize = 32;

const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Only the header fields the codec cares about.
#[derive(Debug, Deserialize)]
struct RawHeader {
    alg: String,
    #[serde(default)]
    typ: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// HS256 token signer/verifier over a single process-wide secret.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenCodec {
    /// Derive the signing key from `secret` (raw bytes are the HMAC key).
    pub fn new(secret: &str) -> Result<Self, CodecError> {
        let bytes = secret.as_bytes();
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(CodecError::WeakKey {
                len: bytes.len(),
                min: MIN_SECRET_BYTES,
            });
        }

        // Expiry is checked against our own clock after the signature passes.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn issue_access_token(&self, subject: &str) -> Result<String, CodecError> {
        self.issue(subject, ACCESS_TOKEN_TTL_SECONDS)
    }

    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, CodecError> {
        self.issue(subject, REFRESH_TOKEN_TTL_SECONDS)
    }

    pub fn issue_token_pair(&self, subject: &str) -> Result<TokenPair, CodecError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(subject)?,
            refresh_token: self.issue_refresh_token(subject)?,
            expires_in: ACCESS_TOKEN_TTL_SECONDS,
        })
    }

    fn issue(&self, subject: &str, ttl_seconds: i64) -> Result<String, CodecError> {
        let now = self.clock.now();
        let exp = now
            .checked_add(ttl_seconds)
            .ok_or(CodecError::ExpiryOutOfRange { iat: now })?;
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now,
            exp,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            CodecError::from(e)
        })
    }

    /// Strip the `Bearer ` prefix from an `Authorization` header value.
    ///
    /// Only an absent header is `Missing`. A present header with any other
    /// scheme is `Malformed`; an empty credential after the prefix is passed
    /// on as-is and rejected by `validate`.
    pub fn extract_bearer(raw_header: Option<&str>) -> Result<&str, TokenError> {
        let raw = raw_header.ok_or(TokenError::Missing)?;
        raw.strip_prefix(BEARER_PREFIX).ok_or(TokenError::Malformed)
    }

    /// Verify signature, then expiry, and return the decoded claims.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        check_structure(token)?;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.exp <= self.clock.now() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    pub fn is_valid(&self, token: &str) -> Result<bool, TokenError> {
        self.validate(token).map(|_| true)
    }

    pub fn subject_of(&self, token: &str) -> Result<String, TokenError> {
        self.validate(token).map(|claims| claims.sub)
    }
}

// Decode every segment before the signature is looked at, so garbled input is
// reported as malformed rather than as a signature mismatch.
fn check_structure(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(TokenError::Malformed);
    };

    let header = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&header).map_err(|_| TokenError::Malformed)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&payload)
        .map_err(|_| TokenError::Malformed)?;

    URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| TokenError::Malformed)?;

    if header.alg != "HS256" {
        return Err(TokenError::Unsupported);
    }
    if let Some(typ) = header.typ.as_deref() {
        if !typ.eq_ignore_ascii_case("JWT") {
            return Err(TokenError::Unsupported);
        }
    }

    Ok(())
}
