//! Catalog route handlers.
//!
//! Read-only JSON over the product and category tables. No auth required.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::{Category, Product, ProductRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Restrict to a category by slug.
    pub category: Option<String>,
}

/// List available products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.category.as_deref())
        .await?;

    Ok(Json(products))
}

/// Product detail by slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))?;

    Ok(Json(product))
}

/// List all categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = ProductRepository::new(state.pool()).list_categories().await?;

    Ok(Json(categories))
}
