//! Application layer services implementing the resolution workflow.
//!
//! Services consume the domain [`crate::domain::Strategy`] trait and provide
//! a clean API for HTTP handlers and the operator CLI.
//!
//! # Available Services
//!
//! - [`services::resolver_service::ResolverService`] - Ordered strategy chain with
//!   per-attempt deadlines, short-circuit on success and full failure reporting

pub mod services;
