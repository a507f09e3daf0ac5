pub mod authenticator;
pub mod clock;
pub mod error;
pub mod exempt;
pub mod identity;
pub mod token_codec;

pub use authenticator::{AuthError, AuthOutcome, RequestAuthenticator};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CodecError, TokenError};
pub use exempt::{DEFAULT_EXEMPT_PATHS, ExemptPathSet};
pub use identity::AuthenticatedIdentity;
pub use token_codec::{TokenClaims, TokenCodec, TokenPair};
