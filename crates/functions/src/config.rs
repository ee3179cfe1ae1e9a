//! Functions service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FUNCTIONS_DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `FUNCTIONS_HOST` - Bind address (default: 127.0.0.1)
//! - `FUNCTIONS_PORT` - Listen port (default: 3002)
//! - `MAPS_API_KEY` - Maps provider key served by the proxy endpoint.
//!   When absent the proxy answers 500; the service still starts.
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Functions service configuration.
#[derive(Debug, Clone)]
pub struct FunctionsConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Maps provider key; served verbatim by the proxy endpoint
    pub maps_api_key: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl FunctionsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    /// A missing `MAPS_API_KEY` is not an error here; the proxy endpoint
    /// reports it per request instead.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("FUNCTIONS_DATABASE_URL")?;
        let host = get_env_or_default("FUNCTIONS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FUNCTIONS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FUNCTIONS_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FUNCTIONS_PORT".to_string(), e.to_string()))?;
        let maps_api_key = get_optional_env("MAPS_API_KEY").map(SecretString::from);
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            maps_api_key,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL (set by managed postgres attach)
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
