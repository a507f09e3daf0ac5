/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the identity installed by the access middleware to handlers
 * - Coarse-grained authority checks (403 via access_denied)
 */

mod core;

pub use self::core::Authenticated;
pub use crate::services::auth::AuthenticatedIdentity;
