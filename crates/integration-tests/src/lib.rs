//! Integration tests for Copperleaf.
//!
//! # Running Tests
//!
//! The tests in `tests/` exercise running services over HTTP and are all
//! `#[ignore]`d by default. To run them:
//!
//! ```bash
//! # Migrate and seed
//! cargo run -p copperleaf-cli -- migrate all
//! cargo run -p copperleaf-cli -- seed
//!
//! # Start both services, then:
//! cargo test -p copperleaf-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - defaults to `http://localhost:3000`
//! - `FUNCTIONS_BASE_URL` - defaults to `http://localhost:3002`

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the functions service (configurable via environment).
#[must_use]
pub fn functions_base_url() -> String {
    std::env::var("FUNCTIONS_BASE_URL").unwrap_or_else(|_| "http://localhost:3002".to_string())
}

/// A fresh cookie-holding client. Each client is one logical shopper; two
/// clients signed in as the same user model two concurrent sessions.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway email per test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@integration.test", Uuid::new_v4())
}

/// Sign up a fresh customer and leave its session in the client's cookie jar.
///
/// Returns the created user JSON.
///
/// # Panics
///
/// Panics if the signup request fails; the tests require running services.
pub async fn signup(client: &Client, email: &str) -> Value {
    let base_url = storefront_base_url();
    let resp = client
        .post(format!("{base_url}/api/auth/signup"))
        .json(&json!({ "email": email, "password": "integration-pass-1" }))
        .send()
        .await
        .expect("Failed to sign up");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse signup response")
}

/// Fetch the first product id from the catalog (the seeder must have run).
///
/// # Panics
///
/// Panics if the catalog is empty or unreachable.
pub async fn any_product_id(client: &Client) -> i64 {
    let base_url = storefront_base_url();
    let products: Vec<Value> = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse products");

    products
        .first()
        .and_then(|p| p["id"].as_i64())
        .expect("Catalog is empty; run the seeder first")
}
