//! Admin access management commands.
//!
//! # Usage
//!
//! ```bash
//! # Grant the admin role to an existing profile
//! copperleaf-cli admin grant -e owner@example.com
//! ```
//!
//! Granting the role is necessary but not sufficient for the admin surface:
//! the gate also requires the profile's email to match the storefront's
//! configured `SUPER_ADMIN_EMAIL`.

use thiserror::Error;

use copperleaf_core::{Email, Role};
use copperleaf_storefront::db::{ProfileRepository, RepositoryError};

use super::migrate::{MigrationError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No profile exists for the email.
    #[error("No profile found with email: {0}")]
    ProfileNotFound(String),

    /// Connection/migration-style setup error.
    #[error(transparent)]
    Setup(#[from] MigrationError),

    /// Repository error.
    #[error("Database error: {0}")]
    Repository(RepositoryError),
}

/// Set an existing profile's role to admin.
///
/// # Errors
///
/// Returns `AdminError::ProfileNotFound` if no profile has this email, and
/// `AdminError` variants for connection or query failures.
pub async fn grant(email: &str) -> Result<(), AdminError> {
    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    let pool = connect("STOREFRONT_DATABASE_URL").await?;

    tracing::info!("Granting admin role to {}...", email.as_str());

    ProfileRepository::new(&pool)
        .set_role(&email, Role::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::ProfileNotFound(email.as_str().to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("Role updated. Remember to set SUPER_ADMIN_EMAIL to match.");
    Ok(())
}
