//! Integration tests for cart behavior.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed applied
//! - The storefront server running (cargo run -p copperleaf-storefront)
//!
//! Run with: cargo test -p copperleaf-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use copperleaf_integration_tests::{any_product_id, client, signup, storefront_base_url, unique_email};

/// Quantity of a product in a cart response, 0 if absent.
fn quantity_of(cart: &Value, product_id: i64) -> i64 {
    cart["items"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|item| item["product_id"].as_i64() == Some(product_id))
        .and_then(|item| item["quantity"].as_i64())
        .unwrap_or(0)
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_repeat_adds_accumulate_quantity() {
    let client = client();
    let base_url = storefront_base_url();
    signup(&client, &unique_email("cart-accumulate")).await;
    let product_id = any_product_id(&client).await;

    // Add 2, then 3: the row must end at 5, not 3.
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart: Value = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 3 }))
        .send()
        .await
        .expect("Failed to add to cart again")
        .json()
        .await
        .expect("Failed to parse cart");

    assert_eq!(quantity_of(&cart, product_id), 5);
    // Still a single line for the product.
    let lines_for_product = cart["items"]
        .as_array()
        .expect("items should be an array")
        .iter()
        .filter(|item| item["product_id"].as_i64() == Some(product_id))
        .count();
    assert_eq!(lines_for_product, 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_concurrent_adds_both_land() {
    // Two sessions for the same user adding the same product at once; the
    // atomic upsert means both quantities sum, no lost update and no error.
    let email = unique_email("cart-concurrent");
    let session_a = client();
    let base_url = storefront_base_url();
    signup(&session_a, &email).await;
    let product_id = any_product_id(&session_a).await;

    let session_b = client();
    let resp = session_b
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": "integration-pass-1" }))
        .send()
        .await
        .expect("Failed to log in second session");
    assert_eq!(resp.status(), StatusCode::OK);

    let add = |client: reqwest::Client, quantity: i64| {
        let url = format!("{base_url}/api/cart/add");
        async move {
            client
                .post(url)
                .json(&json!({ "product_id": product_id, "quantity": quantity }))
                .send()
                .await
                .expect("Failed to add to cart")
                .status()
        }
    };

    let (status_a, status_b) = tokio::join!(add(session_a.clone(), 1), add(session_b, 1));
    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);

    let cart: Value = session_a
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to parse cart");

    assert_eq!(quantity_of(&cart, product_id), 2);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_cart_requires_authentication() {
    let client = client();
    let base_url = storefront_base_url();

    // No session: the mutation must be rejected before anything happens.
    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": 1, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_update_to_zero_removes_row() {
    let client = client();
    let base_url = storefront_base_url();
    signup(&client, &unique_email("cart-zero")).await;
    let product_id = any_product_id(&client).await;

    client
        .post(format!("{base_url}/api/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add to cart");

    let cart: Value = client
        .post(format!("{base_url}/api/cart/update"))
        .json(&json!({ "product_id": product_id, "quantity": 0 }))
        .send()
        .await
        .expect("Failed to update cart")
        .json()
        .await
        .expect("Failed to parse cart");

    assert_eq!(quantity_of(&cart, product_id), 0);
    assert_eq!(cart["subtotal"], Value::Null);
}
