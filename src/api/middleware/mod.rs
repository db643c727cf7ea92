//! HTTP middleware for request processing and response hardening.

pub mod security_headers;
pub mod tracing;
