//! # Reel Resolver
//!
//! Resolves a reel or post link to the direct URL of its media asset by
//! running an ordered chain of independent retrieval strategies.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Reference parsing, strategy contract, outcomes
//! - **Application Layer** ([`application`]) - Strategy chain executor
//! - **Infrastructure Layer** ([`infrastructure`]) - Outbound HTTP and concrete strategies
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - First-success fallback across structured query, page scrape and direct fetch
//! - Optional relay strategy backed by a third-party API
//! - Per-attempt deadlines and cooperative cancellation
//! - Idempotent cleanup of escaped media URLs
//!
//! ## Quick Start
//!
//! ```bash
//! export STRATEGY_ORDER="structured_query,scrape,direct_fetch"  # Optional
//! cargo run
//!
//! curl -X POST localhost:5000/download \
//!      -H 'content-type: application/json' \
//!      -d '{"url":"https://www.instagram.com/reel/C1a2B3c4D5e/"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::ResolverService;
    pub use crate::domain::{
        Attempt, ExecutionContext, PostReference, Resolution, ResolveError, Strategy,
        StrategyFailure, StrategyOutcome,
    };
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
