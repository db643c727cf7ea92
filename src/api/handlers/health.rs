//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{HealthResponse, ResolverInfo};
use crate::state::AppState;

/// Returns service health and the configured strategy chain.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Accepting requests
/// - **503 Service Unavailable**: Shutdown in progress
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "resolver": {
///     "strategies": ["structured_query", "scrape", "direct_fetch"],
///     "attempt_timeout_secs": 20,
///     "accepting_requests": true
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let accepting_requests = !state.shutdown.is_cancelled();

    let response = HealthResponse {
        status: if accepting_requests {
            "healthy"
        } else {
            "shutting_down"
        }
        .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        resolver: ResolverInfo {
            strategies: state
                .resolver
                .strategy_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            attempt_timeout_secs: state.resolver.attempt_timeout().as_secs(),
            accepting_requests,
        },
    };

    if accepting_requests {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
