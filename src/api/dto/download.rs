//! DTOs for the download endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to resolve a reel or post link.
///
/// `url` is optional at the serde level so that a missing field yields the
/// same 400 as an empty one.
#[derive(Debug, Deserialize, Validate)]
pub struct DownloadRequest {
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: Option<String>,
}

/// Successful resolution.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub success: bool,
    pub download_url: String,
    /// Name of the strategy that found the asset.
    pub strategy: String,
}
