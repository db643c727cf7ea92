//! Shared application state for request handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::services::ResolverService;

/// State injected into every handler.
///
/// Cloned per request; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ResolverService>,
    /// Hosts accepted in inbound references, lowercase.
    pub accepted_hosts: Arc<Vec<String>>,
    /// Cancelled on shutdown; each request resolves under a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        resolver: Arc<ResolverService>,
        accepted_hosts: Vec<String>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            resolver,
            accepted_hosts: Arc::new(
                accepted_hosts
                    .into_iter()
                    .map(|h| h.to_ascii_lowercase())
                    .collect(),
            ),
            shutdown,
        }
    }

    pub fn accepts_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.accepted_hosts.iter().any(|h| *h == host)
    }
}
