use thiserror::Error;

/// Why a presented token was not accepted.
///
/// The kinds are kept distinct so callers (and logs) can tell an expired
/// session apart from a forged or garbled credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("jwt access token not found")]
    Missing,

    #[error("jwt token has expired")]
    Expired,

    #[error("jwt token is malformed")]
    Malformed,

    #[error("jwt signature is invalid")]
    SignatureInvalid,

    #[error("jwt token is not supported")]
    Unsupported,
}

impl TokenError {
    /// Stable error code rendered in 401 bodies.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Missing => "JWT_NOT_FOUND",
            TokenError::Expired => "JWT_EXPIRED",
            TokenError::Malformed => "JWT_MALFORMED",
            TokenError::SignatureInvalid => "JWT_SIGNATURE",
            TokenError::Unsupported => "JWT_UNSUPPORTED",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::Unsupported
            }
            // Signature mismatch, key problems and every other verification failure.
            _ => TokenError::SignatureInvalid,
        }
    }
}

/// Failures while setting up the codec or signing a token.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("signing secret too short: {len} bytes (need at least {min})")]
    WeakKey { len: usize, min: usize },

    #[error("token expiry overflows for iat {iat}")]
    ExpiryOutOfRange { iat: i64 },

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}
