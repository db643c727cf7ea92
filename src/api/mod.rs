//! HTTP transport layer for the resolver.
//!
//! Translates requests into resolver calls and formats responses according
//! to the public API contract.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Tracing and response hardening
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
