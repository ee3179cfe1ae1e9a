//! Checkout route handler.
//!
//! The total is computed server-side from the cart rows, never trusted from
//! the client. A completed charge clears the cart; a cancelled one leaves it
//! untouched so the shopper can come back; a failed one surfaces as a 502
//! with the generic failure message.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::db::{CartRepository, cart::subtotal};
use crate::error::{AppError, GENERIC_FAILURE_MESSAGE, Result};
use crate::middleware::RequireAuth;
use crate::services::payments::CheckoutOutcome;
use crate::state::AppState;

/// Charge the cart total and resolve the attempt.
#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn checkout(State(state): State<AppState>, user: RequireAuth) -> Result<Response> {
    let cart = CartRepository::new(state.pool());

    let lines = cart.list(user.0.id).await?;
    let Some(total) = subtotal(&lines)? else {
        return Err(AppError::BadRequest("cart is empty".into()));
    };

    // One reference per attempt; the gateway can use it for idempotency.
    let reference = format!("cl-{}-{}", user.0.id, Uuid::new_v4());

    let outcome = state
        .payments()
        .charge(
            total.amount,
            total.currency_code.code(),
            &reference,
            user.0.email.as_str(),
        )
        .await?;

    match outcome {
        CheckoutOutcome::Completed { provider_reference } => {
            cart.clear(user.0.id).await?;
            tracing::info!(%provider_reference, "checkout completed");

            Ok(Json(json!({
                "status": "completed",
                "provider_reference": provider_reference,
                "amount": total.amount,
                "currency": total.currency_code.code(),
            }))
            .into_response())
        }
        CheckoutOutcome::Cancelled => Ok(Json(json!({ "status": "cancelled" })).into_response()),
        CheckoutOutcome::Failed { reason } => {
            tracing::warn!(%reason, "checkout failed");

            Ok((
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "status": "failed",
                    "error": GENERIC_FAILURE_MESSAGE,
                })),
            )
                .into_response())
        }
    }
}
