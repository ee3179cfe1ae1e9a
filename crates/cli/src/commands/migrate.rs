//! Database migration commands.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for the storefront
//! - `FUNCTIONS_DATABASE_URL` - `PostgreSQL` connection string for the functions service
//!
//! Both fall back to `DATABASE_URL` when unset (the two schemas can share one
//! database in development).

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur during migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn storefront() -> Result<(), MigrationError> {
    let pool = connect("STOREFRONT_DATABASE_URL").await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}

/// Run functions database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn functions() -> Result<(), MigrationError> {
    let pool = connect("FUNCTIONS_DATABASE_URL").await?;

    tracing::info!("Running functions migrations...");
    sqlx::migrate!("../functions/migrations").run(&pool).await?;

    tracing::info!("Functions migrations complete!");
    Ok(())
}

/// Connect using the named variable, falling back to `DATABASE_URL`.
pub(crate) async fn connect(primary_key: &'static str) -> Result<PgPool, MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar(primary_key))?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(&database_url).await?)
}
