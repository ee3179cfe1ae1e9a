//! Integration tests for checkout preconditions.
//!
//! The happy path needs a reachable payment gateway, so only the
//! gateway-independent behavior is covered here.
//!
//! Run with: cargo test -p copperleaf-integration-tests -- --ignored

use reqwest::StatusCode;

use copperleaf_integration_tests::{client, signup, storefront_base_url, unique_email};

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_empty_cart_cannot_check_out() {
    let client = client();
    let base_url = storefront_base_url();
    signup(&client, &unique_email("checkout-empty")).await;

    let resp = client
        .post(format!("{base_url}/api/checkout"))
        .send()
        .await
        .expect("Failed to send checkout request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_requires_authentication() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/checkout"))
        .send()
        .await
        .expect("Failed to send checkout request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
