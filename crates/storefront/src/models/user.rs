//! User domain types.
//!
//! These types represent validated domain objects for authentication and
//! authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use copperleaf_core::{Email, Role, UserId};

/// A profile row (domain type).
///
/// One per authenticated identity. The role decides both invitation rights
/// and (together with the configured email) super-admin access.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Unique user ID.
    pub id: UserId,
    /// The user's email address.
    pub email: Email,
    /// The user's role.
    pub role: Role,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The authenticated user stored in the session.
///
/// Established at sign-in, removed at sign-out; never outlives the session
/// it was written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Unique user ID.
    pub id: UserId,
    /// The user's email address.
    pub email: Email,
    /// The role at sign-in time. Authorization decisions that matter
    /// (the super-admin gate) re-read the role from the database.
    pub role: Role,
}

impl From<&Profile> for CurrentUser {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            role: profile.role,
        }
    }
}
