use chrono::{DateTime, Utc};
use serde::Serialize;

/// Service banner returned by `GET /`.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}
