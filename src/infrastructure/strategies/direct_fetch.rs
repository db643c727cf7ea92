//! Direct-fetch strategy: lightweight per-post data endpoint.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::{ExecutionContext, PostReference, Strategy, StrategyOutcome};
use crate::infrastructure::http::HttpFetcher;
use crate::utils::json_search::find_string_key;
use crate::utils::media_extract::extract_video_url_field;
use crate::utils::url_cleanup::clean_url;

/// Requests `{web_base}/p/{shortcode}/?__a=1&__d=dis` and searches the
/// payload for a `video_url` key.
///
/// JSON bodies are searched recursively; anything else falls back to the
/// quoted `video_url` text pattern.
pub struct DirectFetchStrategy {
    fetcher: HttpFetcher,
    web_base: String,
    app_id: String,
}

impl DirectFetchStrategy {
    pub const NAME: &'static str = "direct_fetch";

    pub fn new(fetcher: HttpFetcher, web_base: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            fetcher,
            web_base: web_base.into(),
            app_id: app_id.into(),
        }
    }
}

/// Extracts a `video_url` from a body that may or may not be JSON.
pub fn extract_from_body(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(payload) => find_string_key(&payload, "video_url").map(clean_url),
        Err(_) => extract_video_url_field(body),
    }
}

#[async_trait]
impl Strategy for DirectFetchStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, reference: &PostReference, ctx: &ExecutionContext) -> StrategyOutcome {
        let url = format!(
            "{}/p/{}/",
            self.web_base.trim_end_matches('/'),
            reference.shortcode()
        );
        debug!("Fetching page data from {}", url);

        let request = self
            .fetcher
            .get(&url)
            .query(&[("__a", "1"), ("__d", "dis")])
            .header("Accept", "application/json, text/plain, */*")
            .header("X-IG-App-ID", &self.app_id);

        self.fetcher
            .fetch_text(request, ctx)
            .await
            .map(|body| extract_from_body(&body))
            .into()
    }
}
