//! Integration tests for wishlist behavior.
//!
//! Run with: cargo test -p copperleaf-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use copperleaf_integration_tests::{any_product_id, client, signup, storefront_base_url, unique_email};

fn entries_for_product(wishlist: &Value, product_id: i64) -> Vec<Value> {
    wishlist["items"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|item| item["product_id"].as_i64() == Some(product_id))
        .cloned()
        .collect()
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_duplicate_add_is_benign() {
    let client = client();
    let base_url = storefront_base_url();
    signup(&client, &unique_email("wishlist-dup")).await;
    let product_id = any_product_id(&client).await;

    let first: Value = client
        .post(format!("{base_url}/api/wishlist/add"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("Failed to add to wishlist")
        .json()
        .await
        .expect("Failed to parse wishlist response");
    assert_eq!(first["status"], "added");
    assert_eq!(entries_for_product(&first, product_id).len(), 1);

    // Second add of the same product: no error, no second row, and the
    // product is still a member of the returned snapshot.
    let second_resp = client
        .post(format!("{base_url}/api/wishlist/add"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("Failed to re-add to wishlist");
    assert_eq!(second_resp.status(), StatusCode::OK);

    let second: Value = second_resp.json().await.expect("Failed to parse wishlist response");
    assert_eq!(second["status"], "already_in_wishlist");
    assert_eq!(entries_for_product(&second, product_id).len(), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_remove_is_scoped_to_owner() {
    let base_url = storefront_base_url();

    // User A wishlists a product.
    let user_a = client();
    signup(&user_a, &unique_email("wishlist-owner")).await;
    let product_id = any_product_id(&user_a).await;

    let added: Value = user_a
        .post(format!("{base_url}/api/wishlist/add"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .expect("Failed to add to wishlist")
        .json()
        .await
        .expect("Failed to parse wishlist response");
    let item_id = entries_for_product(&added, product_id)
        .first()
        .and_then(|item| item["id"].as_i64())
        .expect("Added item should appear in snapshot");

    // User B tries to delete A's row by id: must look nonexistent.
    let user_b = client();
    signup(&user_b, &unique_email("wishlist-intruder")).await;

    let resp = user_b
        .delete(format!("{base_url}/api/wishlist/{item_id}"))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A's wishlist is intact.
    let wishlist: Value = user_a
        .get(format!("{base_url}/api/wishlist"))
        .send()
        .await
        .expect("Failed to fetch wishlist")
        .json()
        .await
        .expect("Failed to parse wishlist");
    assert_eq!(entries_for_product(&wishlist, product_id).len(), 1);

    // And the owner can remove it.
    let resp = user_a
        .delete(format!("{base_url}/api/wishlist/{item_id}"))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::OK);

    let wishlist: Value = resp.json().await.expect("Failed to parse wishlist");
    assert!(entries_for_product(&wishlist, product_id).is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_wishlist_requires_authentication() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/wishlist"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
