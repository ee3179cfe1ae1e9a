//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::FunctionsConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers themselves stay stateless; nothing
/// here changes after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FunctionsConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: FunctionsConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the functions configuration.
    #[must_use]
    pub fn config(&self) -> &FunctionsConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }
}
