//! Cart route handlers.
//!
//! Every mutation re-fetches the full cart and returns it, so the client's
//! view is never stale relative to its own write. All operations require an
//! authenticated session and are scoped to that user.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use copperleaf_core::{Price, ProductId};

use crate::db::{CartLine, CartRepository, cart::subtotal};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// The cart as returned to clients.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    /// Sum of line totals; absent for an empty cart.
    pub subtotal: Option<Price>,
    pub item_count: i64,
}

impl CartResponse {
    fn build(items: Vec<CartLine>) -> Result<Self> {
        let subtotal = subtotal(&items)?;
        let item_count = items.iter().map(|line| i64::from(line.quantity)).sum();

        Ok(Self {
            items,
            subtotal,
            item_count,
        })
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    /// Defaults to 1.
    pub quantity: Option<i32>,
}

/// Update-quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Fetch the user's cart with the current state re-read.
async fn fetch_cart(state: &AppState, user_id: copperleaf_core::UserId) -> Result<CartResponse> {
    let items = CartRepository::new(state.pool()).list(user_id).await?;
    CartResponse::build(items)
}

/// Get the cart.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn show(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<Json<CartResponse>> {
    Ok(Json(fetch_cart(&state, user.0.id).await?))
}

/// Add a product to the cart.
///
/// Quantities accumulate: adding n then m of the same product yields a
/// single row with quantity n+m, via one atomic upsert.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn add(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let quantity = body.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }

    CartRepository::new(state.pool())
        .add(user.0.id, body.product_id, quantity)
        .await?;

    Ok(Json(fetch_cart(&state, user.0.id).await?))
}

/// Set a cart row's quantity outright. Zero removes the row.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn update(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<CartResponse>> {
    if body.quantity < 0 {
        return Err(AppError::BadRequest("quantity must not be negative".into()));
    }

    CartRepository::new(state.pool())
        .set_quantity(user.0.id, body.product_id, body.quantity)
        .await?;

    Ok(Json(fetch_cart(&state, user.0.id).await?))
}

/// Remove a product from the cart.
///
/// Removing a product that isn't in the cart is not an error; the fresh
/// snapshot is returned either way.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn remove(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<Json<CartResponse>> {
    CartRepository::new(state.pool())
        .remove(user.0.id, body.product_id)
        .await?;

    Ok(Json(fetch_cart(&state, user.0.id).await?))
}

/// Empty the cart.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn clear(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<Json<CartResponse>> {
    CartRepository::new(state.pool()).clear(user.0.id).await?;

    Ok(Json(fetch_cart(&state, user.0.id).await?))
}
