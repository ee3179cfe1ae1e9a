//! Database operations for the `functions` schema.
//!
//! Three tables: one metric row per ingestion, zero-or-more linked issue
//! rows, and at most one alert row per ingestion when the score is below
//! the alert threshold. Rows are written once and never updated.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use copperleaf_core::AlertSeverity;

use crate::routes::performance::{MetricsPayload, PerformanceIssue};

/// Repository for performance metric database operations.
pub struct MetricsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MetricsRepository<'a> {
    /// Create a new metrics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert one metric row and return its id.
    ///
    /// The well-known fields are stored as columns; the full payload is kept
    /// verbatim in `raw` so nothing the client sent is lost.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the insert fails.
    pub async fn insert_metric(
        &self,
        url: &str,
        metrics: &MetricsPayload,
        raw: &str,
    ) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar(
            r"
            INSERT INTO functions.performance_metric
                (url, performance_score, first_contentful_paint,
                 largest_contentful_paint, cumulative_layout_shift,
                 time_to_interactive, raw)
            VALUES ($1, $2, $3, $4, $5, $6, $7::jsonb)
            RETURNING id
            ",
        )
        .bind(url)
        .bind(metrics.performance_score)
        .bind(metrics.first_contentful_paint)
        .bind(metrics.largest_contentful_paint)
        .bind(metrics.cumulative_layout_shift)
        .bind(metrics.time_to_interactive)
        .bind(raw)
        .fetch_one(self.pool)
        .await
    }

    /// Insert one issue row linked to a metric.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the insert fails. Callers log and continue;
    /// a lost issue row never rolls back its metric.
    pub async fn insert_issue(
        &self,
        metric_id: Uuid,
        issue: &PerformanceIssue,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO functions.performance_issue
                (metric_id, issue_type, severity, description, recommendation)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(metric_id)
        .bind(&issue.issue_type)
        .bind(issue.severity.as_str())
        .bind(&issue.description)
        .bind(&issue.recommendation)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Insert one alert row for a below-threshold score.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the insert fails.
    pub async fn insert_alert(
        &self,
        metric_id: Uuid,
        severity: AlertSeverity,
        performance_score: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO functions.performance_alert
                (metric_id, severity, performance_score)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(metric_id)
        .bind(severity.as_str())
        .bind(performance_score)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
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
