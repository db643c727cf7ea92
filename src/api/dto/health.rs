//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response with the configured resolution chain.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub resolver: ResolverInfo,
}

#[derive(Debug, Serialize)]
pub struct ResolverInfo {
    /// Strategy names in chain order.
    pub strategies: Vec<String>,
    pub attempt_timeout_secs: u64,
    pub accepting_requests: bool,
}
