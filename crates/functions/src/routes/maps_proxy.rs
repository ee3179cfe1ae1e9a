//! Maps API-key proxy.
//!
//! The browser never holds the maps key in its bundle; it asks this endpoint,
//! which reads the key from process configuration and hands it over with a
//! short private cache lifetime. No request body is consumed, so GET and
//! POST behave identically.

use axum::{Json, extract::State, http::header, response::IntoResponse};
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::instrument;

use crate::error::{FunctionError, Result};
use crate::state::AppState;

/// How long clients may cache the key, privately.
const CACHE_CONTROL_VALUE: &str = "private, max-age=300";

/// Serve the configured maps API key.
#[instrument(skip(state))]
pub async fn maps_proxy(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let Some(key) = state.config().maps_api_key.as_ref() else {
        // The handler reports this per request rather than refusing to start;
        // the other endpoint keeps working without the key.
        return Err(FunctionError::MapsKeyMissing);
    };

    Ok((
        [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)],
        Json(json!({ "apiKey": key.expose_secret() })),
    ))
}
