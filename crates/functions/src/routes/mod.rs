//! HTTP route handlers for the functions service.
//!
//! # Route Structure
//!
//! ```text
//! GET      /health               - Health check
//! GET|POST /maps-proxy           - Serve the maps API key (cached 5 min, private)
//! POST     /performance-monitor  - Ingest a performance measurement
//! ```
//!
//! All routes answer CORS preflights permissively; these endpoints are
//! called straight from browsers on other origins.

pub mod maps_proxy;
pub mod performance;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the functions service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/maps-proxy",
            get(maps_proxy::maps_proxy).post(maps_proxy::maps_proxy),
        )
        .route("/performance-monitor", post(performance::ingest))
}
