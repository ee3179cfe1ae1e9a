//! Database-level assertions on alert creation.
//!
//! These connect straight to the functions database to verify what ingestion
//! wrote, so they need `FUNCTIONS_DATABASE_URL` (or `DATABASE_URL`) in the
//! environment in addition to the running server.
//!
//! Run with: cargo test -p copperleaf-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

use copperleaf_core::AlertSeverity;
use copperleaf_integration_tests::{client, functions_base_url};

async fn pool() -> PgPool {
    let url = std::env::var("FUNCTIONS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("FUNCTIONS_DATABASE_URL or DATABASE_URL must be set");
    PgPool::connect(&url).await.expect("Failed to connect to database")
}

async fn ingest(score: f64) -> Uuid {
    let client = client();
    let base_url = functions_base_url();

    let resp = client
        .post(format!("{base_url}/performance-monitor"))
        .json(&json!({
            "url": "https://copperleaf.shop/",
            "metrics": { "performance_score": score }
        }))
        .send()
        .await
        .expect("Failed to post metrics");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    body["metric_id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("Response should carry a metric id")
}

async fn alert_severity(pool: &PgPool, metric_id: Uuid) -> Option<String> {
    sqlx::query_scalar("SELECT severity FROM functions.performance_alert WHERE metric_id = $1")
        .bind(metric_id)
        .fetch_optional(pool)
        .await
        .expect("Failed to query alerts")
}

#[tokio::test]
#[ignore = "Requires running functions server and direct database access"]
async fn test_alert_thresholds_match_ingested_scores() {
    let pool = pool().await;

    for score in [40.0, 65.0, 85.0] {
        let metric_id = ingest(score).await;
        let written = alert_severity(&pool, metric_id).await;
        let expected = AlertSeverity::for_score(score).map(|s| s.as_str().to_owned());

        assert_eq!(written, expected, "score {score} wrote the wrong alert");
    }
}

#[tokio::test]
#[ignore = "Requires running functions server and direct database access"]
async fn test_boundary_score_creates_no_alert() {
    let pool = pool().await;

    // 70 is the first score considered healthy.
    let metric_id = ingest(70.0).await;
    assert_eq!(alert_severity(&pool, metric_id).await, None);

    // 69.9 is not.
    let metric_id = ingest(69.9).await;
    assert_eq!(alert_severity(&pool, metric_id).await, Some("medium".to_owned()));
}
