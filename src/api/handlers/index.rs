//! Handler for the service banner.

use axum::Json;
use chrono::Utc;

use crate::api::dto::index::IndexResponse;

/// Returns a short banner confirming the service is up.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Reel resolver API is running".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
