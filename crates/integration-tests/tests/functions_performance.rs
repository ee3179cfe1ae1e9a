//! Integration tests for the functions service.
//!
//! Requires the functions server running (cargo run -p copperleaf-functions)
//! with its database migrated.
//!
//! Run with: cargo test -p copperleaf-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use copperleaf_integration_tests::{client, functions_base_url};

async fn record_metrics(score: f64, issues: Value) -> Value {
    let client = client();
    let base_url = functions_base_url();

    let resp = client
        .post(format!("{base_url}/performance-monitor"))
        .json(&json!({
            "url": "https://copperleaf.shop/collections/teas",
            "metrics": {
                "performance_score": score,
                "largest_contentful_paint": 2100.0,
                "cumulative_layout_shift": 0.04
            },
            "issues": issues
        }))
        .send()
        .await
        .expect("Failed to post metrics");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore = "Requires running functions server and migrated database"]
async fn test_low_score_with_issues_is_recorded() {
    let body = record_metrics(
        45.0,
        json!([{
            "type": "cumulative_layout_shift",
            "severity": "high",
            "description": "Hero image loads without reserved dimensions",
            "recommendation": "Set explicit width and height on the hero image"
        }]),
    )
    .await;

    assert_eq!(body["success"], true);
    assert!(body["metric_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["message"], "Performance metrics recorded");
}

#[tokio::test]
#[ignore = "Requires running functions server and migrated database"]
async fn test_healthy_score_without_issues_is_recorded() {
    let body = record_metrics(92.5, json!([])).await;

    assert_eq!(body["success"], true);
    assert!(body["metric_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
#[ignore = "Requires running functions server and migrated database"]
async fn test_issues_field_is_optional() {
    let client = client();
    let base_url = functions_base_url();

    let resp = client
        .post(format!("{base_url}/performance-monitor"))
        .json(&json!({
            "url": "https://copperleaf.shop/",
            "metrics": { "performance_score": 64.0 }
        }))
        .send()
        .await
        .expect("Failed to post metrics");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running functions server with MAPS_API_KEY set"]
async fn test_maps_proxy_returns_key_with_private_caching() {
    let client = client();
    let base_url = functions_base_url();

    let resp = client
        .get(format!("{base_url}/maps-proxy"))
        .send()
        .await
        .expect("Failed to call maps proxy");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("private, max-age=300")
    );

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["apiKey"].as_str().is_some_and(|key| !key.is_empty()));
}
