//! API route configuration.

use crate::api::handlers::{download_handler, health_handler, index_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public routes.
///
/// # Endpoints
///
/// - `GET  /`          - Service banner
/// - `GET  /health`    - Health and configured strategy chain
/// - `POST /download`  - Resolve a reel or post link
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/download", post(download_handler))
}
