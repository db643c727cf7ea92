//! Scrape strategy: fetch the post document and pattern-search it.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{ExecutionContext, PostReference, Strategy, StrategyOutcome};
use crate::infrastructure::http::HttpFetcher;
use crate::utils::media_extract::{MediaFilter, extract_from_html};

/// Fetches the raw HTML of the post page and extracts an embedded media URL.
///
/// The document is requested from the configured web base, rebuilt from the
/// reference's kind and shortcode, never from the host in the raw reference.
pub struct ScrapeStrategy {
    fetcher: HttpFetcher,
    web_base: String,
    filter: MediaFilter,
}

impl ScrapeStrategy {
    pub const NAME: &'static str = "scrape";

    pub fn new(fetcher: HttpFetcher, web_base: impl Into<String>, filter: MediaFilter) -> Self {
        Self {
            fetcher,
            web_base: web_base.into(),
            filter,
        }
    }
}

#[async_trait]
impl Strategy for ScrapeStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, reference: &PostReference, ctx: &ExecutionContext) -> StrategyOutcome {
        let url = reference.canonical_url(&self.web_base);
        debug!("Scraping {}", url);

        let result = self
            .fetcher
            .fetch_text(self.fetcher.get(&url), ctx)
            .await
            .map(|html| extract_from_html(&html, &self.filter));

        result.into()
    }
}
