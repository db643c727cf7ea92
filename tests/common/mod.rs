#![allow(dead_code)]

use async_trait::async_trait;
use reel_resolver::application::services::ResolverService;
use reel_resolver::domain::{ExecutionContext, PostReference, Strategy, StrategyOutcome};
use reel_resolver::infrastructure::http::{BrowserIdentity, HttpFetcher};
use reel_resolver::infrastructure::strategies::{StructuredQueryConfig, UpstreamSettings};
use reel_resolver::state::AppState;
use reel_resolver::utils::media_extract::MediaFilter;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const REEL_URL: &str = "https://www.instagram.com/reel/C1a2B3c4D5e/";
pub const POST_URL: &str = "https://www.instagram.com/p/C1a2B3c4D5e/";
pub const SHORTCODE: &str = "C1a2B3c4D5e";

/// Strategy returning a fixed outcome and counting its invocations.
pub struct StubStrategy {
    name: &'static str,
    outcome: StrategyOutcome,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Strategy for StubStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn attempt(&self, _: &PostReference, _: &ExecutionContext) -> StrategyOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Returns the stub and a handle to its call counter.
pub fn stub(name: &'static str, outcome: StrategyOutcome) -> (Arc<dyn Strategy>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let strategy = Arc::new(StubStrategy {
        name,
        outcome,
        calls: calls.clone(),
    });
    (strategy, calls)
}

pub fn found(url: &str) -> StrategyOutcome {
    StrategyOutcome::Found(url.to_string())
}

pub fn create_resolver(strategies: Vec<Arc<dyn Strategy>>) -> Arc<ResolverService> {
    Arc::new(ResolverService::new(strategies, Duration::from_secs(5)).unwrap())
}

pub fn create_test_state(strategies: Vec<Arc<dyn Strategy>>) -> AppState {
    AppState::new(
        create_resolver(strategies),
        vec!["instagram.com".to_string(), "www.instagram.com".to_string()],
        CancellationToken::new(),
    )
}

pub fn test_fetcher() -> HttpFetcher {
    HttpFetcher::new(&BrowserIdentity::default()).unwrap()
}

/// Settings pointing every upstream at `base` (a mock server URI).
pub fn upstream_settings(base: &str) -> UpstreamSettings {
    UpstreamSettings {
        web_base: base.to_string(),
        structured_query: StructuredQueryConfig {
            base_url: base.to_string(),
            query_hash: "test-hash".to_string(),
            app_id: "936619743392459".to_string(),
        },
        relay: None,
        media_filter: MediaFilter::new(["cdninstagram.com", "fbcdn.net", "cdn.example"]),
    }
}

pub fn context() -> ExecutionContext {
    ExecutionContext::new(Duration::from_secs(5), CancellationToken::new())
}
