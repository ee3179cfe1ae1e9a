//! Invite maintenance commands.
//!
//! # Usage
//!
//! ```bash
//! # Delete expired, never-accepted invites
//! copperleaf-cli invites prune
//! ```

use thiserror::Error;

use copperleaf_storefront::db::{InviteRepository, RepositoryError};

use super::migrate::{MigrationError, connect};

/// Errors that can occur during invite maintenance.
#[derive(Debug, Error)]
pub enum InviteError {
    /// Connection/migration-style setup error.
    #[error(transparent)]
    Setup(#[from] MigrationError),

    /// Repository error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Delete expired pending invites.
///
/// Accepted invites are kept as an audit trail regardless of age.
///
/// # Errors
///
/// Returns `InviteError` if the connection or the delete fails.
pub async fn prune() -> Result<(), InviteError> {
    let pool = connect("STOREFRONT_DATABASE_URL").await?;

    let deleted = InviteRepository::new(&pool).delete_expired().await?;
    tracing::info!("Pruned {deleted} expired invite(s).");

    Ok(())
}
