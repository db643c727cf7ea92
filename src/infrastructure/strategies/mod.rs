//! Concrete resolution strategies.
//!
//! Each strategy is an independent retrieval technique against the same
//! post. The chain order is chosen by configuration (see [`StrategyKind`]).
//!
//! # Strategies
//!
//! - [`StructuredQueryStrategy`] - GraphQL query endpoint keyed by shortcode
//! - [`ScrapeStrategy`] - Raw HTML of the post page, regex and DOM search
//! - [`DirectFetchStrategy`] - Lightweight page-data endpoint, recursive key search
//! - [`RelayStrategy`] - Third-party relay API with a credential header

pub mod direct_fetch;
pub mod relay;
pub mod scrape;
pub mod structured_query;

pub use direct_fetch::DirectFetchStrategy;
pub use relay::{RelayConfig, RelayStrategy};
pub use scrape::ScrapeStrategy;
pub use structured_query::{StructuredQueryConfig, StructuredQueryStrategy};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::Strategy;
use crate::infrastructure::http::HttpFetcher;
use crate::utils::media_extract::MediaFilter;

/// Names accepted in the configured strategy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    StructuredQuery,
    Scrape,
    DirectFetch,
    Relay,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::StructuredQuery => StructuredQueryStrategy::NAME,
            StrategyKind::Scrape => ScrapeStrategy::NAME,
            StrategyKind::DirectFetch => DirectFetchStrategy::NAME,
            StrategyKind::Relay => RelayStrategy::NAME,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structured_query" | "graphql" => Ok(StrategyKind::StructuredQuery),
            "scrape" => Ok(StrategyKind::Scrape),
            "direct_fetch" | "direct" => Ok(StrategyKind::DirectFetch),
            "relay" => Ok(StrategyKind::Relay),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

/// Immutable upstream settings shared by the strategies.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub web_base: String,
    pub structured_query: StructuredQueryConfig,
    pub relay: Option<RelayConfig>,
    pub media_filter: MediaFilter,
}

/// Instantiates the strategies in the given order.
///
/// # Errors
///
/// Returns an error naming the strategy if `relay` is requested without
/// relay settings.
pub fn build_strategies(
    order: &[StrategyKind],
    settings: &UpstreamSettings,
    fetcher: &HttpFetcher,
) -> Result<Vec<Arc<dyn Strategy>>, String> {
    order
        .iter()
        .map(|kind| -> Result<Arc<dyn Strategy>, String> {
            let strategy: Arc<dyn Strategy> = match kind {
                StrategyKind::StructuredQuery => Arc::new(StructuredQueryStrategy::new(
                    fetcher.clone(),
                    settings.structured_query.clone(),
                )),
                StrategyKind::Scrape => Arc::new(ScrapeStrategy::new(
                    fetcher.clone(),
                    settings.web_base.clone(),
                    settings.media_filter.clone(),
                )),
                StrategyKind::DirectFetch => Arc::new(DirectFetchStrategy::new(
                    fetcher.clone(),
                    settings.web_base.clone(),
                    settings.structured_query.app_id.clone(),
                )),
                StrategyKind::Relay => {
                    let relay = settings.relay.clone().ok_or_else(|| {
                        "relay strategy requires RELAY_URL and RELAY_API_KEY".to_string()
                    })?;
                    Arc::new(RelayStrategy::new(
                        fetcher.clone(),
                        relay,
                        settings.media_filter.clone(),
                    ))
                }
            };
            Ok(strategy)
        })
        .collect()
}
