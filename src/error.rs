use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::{Attempt, ResolveError, StrategyOutcome};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
pub struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Upstream { message: String, details: Value },
    Unavailable { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn upstream(message: impl Into<String>, details: Value) -> Self {
        Self::Upstream {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    /// Maps an exhausted chain to a transport error.
    ///
    /// Only `NotFound` outcomes mean the post exposes no media (404); any
    /// failed attempt means the upstream could not be read (502).
    pub fn exhausted(attempts: &[Attempt]) -> Self {
        let details = json!({
            "attempts": attempts.iter().map(attempt_details).collect::<Vec<_>>()
        });

        if attempts.iter().any(|a| a.outcome.is_failure()) {
            Self::upstream("Could not extract media URL from upstream", details)
        } else {
            Self::not_found("No media URL found for this post", details)
        }
    }
}

fn attempt_details(attempt: &Attempt) -> Value {
    let reason = match &attempt.outcome {
        StrategyOutcome::Failed(failure) => Some(failure.to_string()),
        _ => None,
    };

    json!({
        "strategy": attempt.strategy,
        "outcome": attempt.outcome.kind(),
        "reason": reason,
    })
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Parse(parse) => AppError::bad_request(parse.to_string(), json!({})),
            ResolveError::Cancelled => {
                AppError::unavailable("Service is shutting down", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let message = e
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation failed".to_string());

        AppError::bad_request(message, json!(e))
    }
}

/// A missing or unreadable body is reported like a missing URL.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request("URL is required", json!({ "reason": rejection.body_text() }))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Upstream { message, details } => {
                (StatusCode::BAD_GATEWAY, "upstream_error", message, details)
            }
            AppError::Unavailable { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                message,
                details,
            ),
        };

        if status.is_server_error() {
            tracing::warn!("{} ({}): {}", status, code, message);
        }

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
