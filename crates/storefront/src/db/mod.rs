//! Database operations for storefront `PostgreSQL`.
//!
//! # Schema: `storefront`
//!
//! ## Tables
//!
//! - `profile` - Authentication identity + role (one row per user)
//! - `category` / `product` - Catalog
//! - `cart_item` - One row per (user, product), quantity accumulates
//! - `wishlist_item` - One row per (user, product), uniqueness enforced
//! - `role_hierarchy` - Static reference data: which roles a role may invite
//! - `invite` - Pending invitations (token + expiry)
//!
//! Session storage lives in the `tower_sessions` schema (store defaults).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p copperleaf-cli -- migrate storefront
//! ```

pub mod cart;
pub mod invites;
pub mod products;
pub mod profiles;
pub mod roles;
pub mod wishlist;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::{CartLine, CartRepository};
pub use invites::{Invite, InviteRepository};
pub use products::{Category, Product, ProductRepository};
pub use profiles::ProfileRepository;
pub use roles::{RoleHierarchyEntry, RoleHierarchyRepository};
pub use wishlist::{WishlistAdd, WishlistEntry, WishlistRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, converting unique violations into `Conflict`.
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
