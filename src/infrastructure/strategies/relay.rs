//! Relay strategy: third-party download API holding its own upstream session.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::{ExecutionContext, PostReference, Strategy, StrategyFailure, StrategyOutcome};
use crate::infrastructure::http::HttpFetcher;
use crate::utils::json_search::find_first_of;
use crate::utils::media_extract::MediaFilter;
use crate::utils::url_cleanup::clean_url;

/// Keys searched in the relay payload, in priority order.
const RELAY_KEYS: &[&str] = &["video_url", "download_url"];

/// Credentials and endpoint for the relay host.
#[derive(Clone)]
pub struct RelayConfig {
    pub endpoint: String,
    pub api_key: String,
    pub key_header: String,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("key_header", &self.key_header)
            .finish()
    }
}

/// Forwards the raw reference to a relay API authenticated by a key header.
pub struct RelayStrategy {
    fetcher: HttpFetcher,
    config: RelayConfig,
    filter: MediaFilter,
}

impl RelayStrategy {
    pub const NAME: &'static str = "relay";

    pub fn new(fetcher: HttpFetcher, config: RelayConfig, filter: MediaFilter) -> Self {
        Self {
            fetcher,
            config,
            filter,
        }
    }
}

#[async_trait]
impl Strategy for RelayStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, reference: &PostReference, ctx: &ExecutionContext) -> StrategyOutcome {
        debug!("Asking relay for {}", reference.shortcode());

        let request = self
            .fetcher
            .get(&self.config.endpoint)
            .query(&[("url", reference.raw())])
            .header("Accept", "application/json")
            .header(self.config.key_header.as_str(), &self.config.api_key);

        let body = match self.fetcher.fetch_text(request, ctx).await {
            Ok(body) => body,
            Err(failure) => return StrategyOutcome::Failed(failure),
        };

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => return StrategyOutcome::Failed(StrategyFailure::Malformed(e.to_string())),
        };

        let candidate = find_first_of(&payload, RELAY_KEYS)
            .map(clean_url)
            .filter(|url| self.filter.is_plausible(url));

        StrategyOutcome::from_candidate(candidate)
    }
}
