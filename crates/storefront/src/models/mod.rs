//! Domain models for the storefront.

pub mod user;

pub use user::{CurrentUser, Profile};

/// Session storage keys.
///
/// Keys are versioned implicitly by name; changing the shape of a stored
/// value requires a new key.
pub mod session_keys {
    /// The authenticated user for this session.
    pub const CURRENT_USER: &str = "current_user";
}
