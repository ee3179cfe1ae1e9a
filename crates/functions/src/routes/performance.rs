//! Performance metrics ingestion.
//!
//! One metric row per submission, zero-or-more linked issue rows, and an
//! alert row auto-created when the score crosses the threshold. A failed
//! issue insert is logged and ignored; the metric row stands. Alerts are
//! decided at ingestion time only, never retroactively.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use copperleaf_core::{AlertSeverity, IssueSeverity};

use crate::db::MetricsRepository;
use crate::error::{FunctionError, Result};
use crate::state::AppState;

/// Ingestion request body.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub metrics: MetricsPayload,
    pub url: String,
    #[serde(default)]
    pub issues: Vec<PerformanceIssue>,
}

/// The well-known metric fields. Anything else the client sends survives in
/// the raw payload column.
#[derive(Debug, Deserialize)]
pub struct MetricsPayload {
    pub performance_score: f64,
    pub first_contentful_paint: Option<f64>,
    pub largest_contentful_paint: Option<f64>,
    pub cumulative_layout_shift: Option<f64>,
    pub time_to_interactive: Option<f64>,
}

/// A client-reported issue accompanying a measurement.
#[derive(Debug, Deserialize)]
pub struct PerformanceIssue {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub severity: IssueSeverity,
    pub description: String,
    pub recommendation: String,
}

/// Ingest one performance measurement.
#[instrument(skip(state, body), fields(url = %body.url))]
pub async fn ingest(
    State(state): State<AppState>,
    Json(body): Json<IngestRequest>,
) -> Result<Json<Value>> {
    let repo = MetricsRepository::new(state.pool());

    let raw = serde_json::to_string(&json!({
        "url": body.url,
        "performance_score": body.metrics.performance_score,
        "first_contentful_paint": body.metrics.first_contentful_paint,
        "largest_contentful_paint": body.metrics.largest_contentful_paint,
        "cumulative_layout_shift": body.metrics.cumulative_layout_shift,
        "time_to_interactive": body.metrics.time_to_interactive,
        "issue_count": body.issues.len(),
    }))
    .map_err(|e| FunctionError::Internal(e.to_string()))?;

    let metric_id = repo.insert_metric(&body.url, &body.metrics, &raw).await?;

    // Issue rows are best-effort: losing one is logged, never fatal, and the
    // metric row above is not rolled back.
    for issue in &body.issues {
        if let Err(e) = repo.insert_issue(metric_id, issue).await {
            tracing::warn!(
                %metric_id,
                issue_type = %issue.issue_type,
                error = %e,
                "failed to insert performance issue; continuing"
            );
        }
    }

    let score = body.metrics.performance_score;
    if let Some(severity) = AlertSeverity::for_score(score) {
        repo.insert_alert(metric_id, severity, score).await?;
        tracing::info!(%metric_id, %severity, score, "performance alert created");
    }

    Ok(Json(json!({
        "success": true,
        "metric_id": metric_id,
        "message": "Performance metrics recorded",
    })))
}
