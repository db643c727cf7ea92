//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to one endpoint.

pub mod download;
pub mod health;
pub mod index;

pub use download::download_handler;
pub use health::health_handler;
pub use index::index_handler;
