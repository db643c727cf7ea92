//! Outbound HTTP plumbing.

mod fetcher;

pub use fetcher::{BrowserIdentity, DEFAULT_MAX_BODY_BYTES, HttpFetcher};
