//! Integration tests for the super-admin gate on the admin surface.
//!
//! Run with: cargo test -p copperleaf-integration-tests -- --ignored

use reqwest::StatusCode;

use copperleaf_integration_tests::{client, signup, storefront_base_url, unique_email};

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_anonymous_admin_request_is_unauthorized() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/admin/invites"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_customer_session_is_forbidden() {
    let client = client();
    let base_url = storefront_base_url();

    // A fresh customer is authenticated but neither an admin nor the
    // configured super admin: the gate must fail closed with 403.
    signup(&client, &unique_email("admin-gate")).await;

    let resp = client
        .get(format!("{base_url}/api/admin/invites"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(format!("{base_url}/api/admin/roles"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_logout_invalidates_session() {
    let client = client();
    let base_url = storefront_base_url();
    signup(&client, &unique_email("session-logout")).await;

    // Authenticated before logout.
    let resp = client
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/api/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::OK);

    // The old cookie no longer authenticates.
    let resp = client
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
