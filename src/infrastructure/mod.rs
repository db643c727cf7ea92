//! Infrastructure layer for external integrations.
//!
//! This layer implements the strategy contract defined by the domain layer
//! against real upstream hosts.
//!
//! # Modules
//!
//! - [`http`] - Shared outbound client with a browser-like identity
//! - [`strategies`] - Scrape, structured-query, direct-fetch and relay strategies

pub mod http;
pub mod strategies;
