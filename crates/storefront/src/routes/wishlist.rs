//! Wishlist route handlers.
//!
//! Adds report duplicates as a benign `already_in_wishlist` status rather
//! than an error, and every mutation returns a freshly fetched snapshot.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use copperleaf_core::{ProductId, WishlistItemId};

use crate::db::{WishlistAdd, WishlistEntry, WishlistRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// The wishlist as returned to clients.
#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub items: Vec<WishlistEntry>,
}

/// Response to an add, carrying the outcome and the fresh snapshot.
#[derive(Debug, Serialize)]
pub struct WishlistAddResponse {
    /// `"added"` or `"already_in_wishlist"`.
    pub status: &'static str,
    pub items: Vec<WishlistEntry>,
}

/// Add-to-wishlist request body.
#[derive(Debug, Deserialize)]
pub struct AddToWishlistRequest {
    pub product_id: ProductId,
}

/// Get the wishlist.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn show(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<Json<WishlistResponse>> {
    let items = WishlistRepository::new(state.pool()).list(user.0.id).await?;

    Ok(Json(WishlistResponse { items }))
}

/// Add a product to the wishlist.
///
/// A duplicate add changes nothing and reports `already_in_wishlist`; the
/// added product is always a member of the returned snapshot.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn add(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(body): Json<AddToWishlistRequest>,
) -> Result<Json<WishlistAddResponse>> {
    let repo = WishlistRepository::new(state.pool());

    let status = match repo.add(user.0.id, body.product_id).await? {
        WishlistAdd::Added(_) => "added",
        WishlistAdd::AlreadyPresent => "already_in_wishlist",
    };

    let items = repo.list(user.0.id).await?;

    Ok(Json(WishlistAddResponse { status, items }))
}

/// Remove a product from the wishlist.
///
/// Deletion is by row id, so the product is resolved to the caller's row
/// first; a product the caller never wishlisted is a 404.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn remove_product(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(body): Json<AddToWishlistRequest>,
) -> Result<Json<WishlistResponse>> {
    let repo = WishlistRepository::new(state.pool());

    let item_id = repo
        .item_id_for_product(user.0.id, body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {} in wishlist", body.product_id)))?;

    repo.remove(user.0.id, item_id).await?;
    let items = repo.list(user.0.id).await?;

    Ok(Json(WishlistResponse { items }))
}

/// Remove a wishlist row by id.
///
/// The delete is scoped to the caller; a row id belonging to another user
/// is indistinguishable from a nonexistent one (404 either way).
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn remove(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(item_id): Path<WishlistItemId>,
) -> Result<Json<WishlistResponse>> {
    let repo = WishlistRepository::new(state.pool());

    let deleted = repo.remove(user.0.id, item_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("wishlist item {item_id}")));
    }

    let items = repo.list(user.0.id).await?;

    Ok(Json(WishlistResponse { items }))
}
