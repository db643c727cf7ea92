//! Handler for the download endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::json;
use url::Url;
use validator::Validate;

use crate::api::dto::download::{DownloadRequest, DownloadResponse};
use crate::domain::Resolution;
use crate::error::AppError;
use crate::state::AppState;

const INVALID_REFERENCE: &str = "Invalid Instagram URL. Please use a reel or post URL.";

/// Resolves a reel or post link to a direct media URL.
///
/// # Endpoint
///
/// `POST /download`
///
/// # Request Body
///
/// ```json
/// { "url": "https://www.instagram.com/reel/C1a2B3c4D5e/" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "downloadUrl": "https://scontent.cdninstagram.com/v/t66/clip.mp4",
///   "strategy": "structured_query"
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: Missing or unreadable body, missing URL, foreign host,
///   or no `/reel/` or `/p/` segment
/// - **404 Not Found**: Every strategy ran and none found media
/// - **502 Bad Gateway**: At least one strategy failed against the upstream
/// - **503 Service Unavailable**: Shutdown interrupted the resolution
pub async fn download_handler(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<DownloadResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let url = payload
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::bad_request("URL is required", json!({})))?;

    check_reference(&state, url)?;

    let resolution = state
        .resolver
        .resolve_with_cancellation(url, state.shutdown.child_token())
        .await?;

    match resolution {
        Resolution::Resolved {
            asset_url,
            strategy,
        } => Ok(Json(DownloadResponse {
            success: true,
            download_url: asset_url,
            strategy: strategy.to_string(),
        })),
        Resolution::Exhausted { attempts } => Err(AppError::exhausted(&attempts)),
    }
}

/// Accepts only http(s) links on a configured host with a post segment.
fn check_reference(state: &AppState, raw: &str) -> Result<(), AppError> {
    let parsed = Url::parse(raw)
        .map_err(|e| AppError::bad_request(INVALID_REFERENCE, json!({ "reason": e.to_string() })))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::bad_request(
            INVALID_REFERENCE,
            json!({ "reason": "unsupported scheme", "scheme": parsed.scheme() }),
        ));
    }

    let host = parsed.host_str().unwrap_or_default();
    if !state.accepts_host(host) {
        return Err(AppError::bad_request(
            INVALID_REFERENCE,
            json!({ "reason": "host not accepted", "host": host }),
        ));
    }

    let path = parsed.path();
    if !path.contains("/reel/") && !path.contains("/p/") {
        return Err(AppError::bad_request(
            INVALID_REFERENCE,
            json!({ "reason": "no reel or post segment" }),
        ));
    }

    Ok(())
}
