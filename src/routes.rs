//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`          - Service banner
//! - `GET  /health`    - Health and strategy chain
//! - `POST /download`  - Resolve a reel or post link
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, the API is called from browser front-ends
//! - **Body limit** - 10 MiB JSON bodies
//! - **Security headers** - `nosniff`, frame denial, no referrer
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{security_headers, tracing};
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_routes(state))
}

/// Routes with every middleware except path normalization, which has to
/// wrap the router from the outside.
pub fn app_routes(state: AppState) -> Router {
    api::routes::public_routes()
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(security_headers::layer())
        .layer(tracing::layer())
}
