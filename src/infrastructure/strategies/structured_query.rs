//! Structured-query strategy: GraphQL lookup keyed by shortcode.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::{ExecutionContext, PostReference, Strategy, StrategyFailure, StrategyOutcome};
use crate::infrastructure::http::HttpFetcher;
use crate::utils::json_search::{string_at, value_at};
use crate::utils::url_cleanup::clean_url;

/// Known locations of the media node, most common first.
const MEDIA_CONTAINERS: &[&[&str]] = &[
    &["data", "shortcode_media"],
    &["data", "media"],
    &["graphql", "shortcode_media"],
    &["graphql", "media"],
    &["shortcode_media"],
    &["media"],
    &["data", "xdt_shortcode_media"],
];

/// Leaf accessors applied to a media node, in priority order.
const LEAF_ACCESSORS: &[fn(&Value) -> Option<&str>] =
    &[direct_video, first_sidecar_video, flagged_display_asset];

fn direct_video(media: &Value) -> Option<&str> {
    string_at(media, &["video_url"])
}

fn first_sidecar_video(media: &Value) -> Option<&str> {
    string_at(
        media,
        &["edge_sidecar_to_children", "edges", "0", "node", "video_url"],
    )
    .or_else(|| string_at(media, &["carousel_media", "0", "video_url"]))
}

/// Display assets are images unless explicitly flagged as video content.
fn flagged_display_asset(media: &Value) -> Option<&str> {
    let is_video = value_at(media, &["is_video"])
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if is_video {
        string_at(media, &["display_url"])
    } else {
        None
    }
}

/// Walks the known response shapes and returns the first populated leaf.
///
/// A direct `video_url` in any shape beats the fallbacks of an earlier one.
pub fn extract_video_url(payload: &Value) -> Option<&str> {
    let containers: Vec<&Value> = MEDIA_CONTAINERS
        .iter()
        .filter_map(|path| value_at(payload, path))
        .filter(|media| media.is_object())
        .collect();

    LEAF_ACCESSORS
        .iter()
        .find_map(|accessor| containers.iter().find_map(|&media| accessor(media)))
}

/// Settings for the structured query endpoint.
#[derive(Debug, Clone)]
pub struct StructuredQueryConfig {
    pub base_url: String,
    pub query_hash: String,
    pub app_id: String,
}

/// Calls the GraphQL query endpoint and walks the known response shapes.
pub struct StructuredQueryStrategy {
    fetcher: HttpFetcher,
    config: StructuredQueryConfig,
}

impl StructuredQueryStrategy {
    pub const NAME: &'static str = "structured_query";

    pub fn new(fetcher: HttpFetcher, config: StructuredQueryConfig) -> Self {
        Self { fetcher, config }
    }
}

#[async_trait]
impl Strategy for StructuredQueryStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self, reference: &PostReference, ctx: &ExecutionContext) -> StrategyOutcome {
        let url = format!(
            "{}/graphql/query/",
            self.config.base_url.trim_end_matches('/')
        );
        let variables = json!({ "shortcode": reference.shortcode().as_str() }).to_string();

        let request = self
            .fetcher
            .get(&url)
            .query(&[
                ("query_hash", self.config.query_hash.as_str()),
                ("variables", variables.as_str()),
            ])
            .header("Accept", "*/*")
            .header("X-IG-App-ID", &self.config.app_id)
            .header("X-Requested-With", "XMLHttpRequest");

        debug!("Querying GraphQL for {}", reference.shortcode());

        let body = match self.fetcher.fetch_text(request, ctx).await {
            Ok(body) => body,
            Err(failure) => return StrategyOutcome::Failed(failure),
        };

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => return StrategyOutcome::Failed(StrategyFailure::Malformed(e.to_string())),
        };

        StrategyOutcome::from_candidate(extract_video_url(&payload).map(clean_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_media_shape() {
        let payload = json!({ "data": { "media": { "video_url": "https://cdn.example/y.mp4" } } });
        assert_eq!(extract_video_url(&payload), Some("https://cdn.example/y.mp4"));
    }

    #[test]
    fn test_graphql_shortcode_media_shape() {
        let payload = json!({
            "graphql": { "shortcode_media": { "video_url": "https://cdn.example/g.mp4" } }
        });
        assert_eq!(extract_video_url(&payload), Some("https://cdn.example/g.mp4"));
    }

    #[test]
    fn test_bare_media_shape() {
        let payload = json!({ "media": { "video_url": "https://cdn.example/m.mp4" } });
        assert_eq!(extract_video_url(&payload), Some("https://cdn.example/m.mp4"));
    }

    #[test]
    fn test_shape_order() {
        let payload = json!({
            "data": { "media": { "video_url": "https://cdn.example/first.mp4" } },
            "media": { "video_url": "https://cdn.example/second.mp4" }
        });
        assert_eq!(extract_video_url(&payload), Some("https://cdn.example/first.mp4"));
    }

    #[test]
    fn test_sidecar_first_child() {
        let payload = json!({
            "data": { "shortcode_media": {
                "edge_sidecar_to_children": { "edges": [
                    { "node": { "video_url": "https://cdn.example/child0.mp4" } },
                    { "node": { "video_url": "https://cdn.example/child1.mp4" } }
                ] }
            } }
        });
        assert_eq!(extract_video_url(&payload), Some("https://cdn.example/child0.mp4"));
    }

    #[test]
    fn test_direct_video_in_later_shape_beats_earlier_sidecar() {
        let payload = json!({
            "data": { "media": {
                "edge_sidecar_to_children": { "edges": [
                    { "node": { "video_url": "https://cdn.example/child.mp4" } }
                ] }
            } },
            "graphql": { "media": { "video_url": "https://cdn.example/main.mp4" } }
        });
        assert_eq!(extract_video_url(&payload), Some("https://cdn.example/main.mp4"));
    }

    #[test]
    fn test_carousel_first_child() {
        let payload = json!({
            "media": { "carousel_media": [{ "video_url": "https://cdn.example/c0.mp4" }] }
        });
        assert_eq!(extract_video_url(&payload), Some("https://cdn.example/c0.mp4"));
    }

    #[test]
    fn test_display_asset_requires_video_flag() {
        let image = json!({
            "data": { "media": { "display_url": "https://cdn.example/img.jpg", "is_video": false } }
        });
        assert_eq!(extract_video_url(&image), None);

        let unflagged = json!({
            "data": { "media": { "display_url": "https://cdn.example/img.jpg" } }
        });
        assert_eq!(extract_video_url(&unflagged), None);

        let video = json!({
            "data": { "media": { "display_url": "https://cdn.example/v.jpg", "is_video": true } }
        });
        assert_eq!(extract_video_url(&video), Some("https://cdn.example/v.jpg"));
    }

    #[test]
    fn test_unknown_shape() {
        let payload = json!({ "status": "fail", "message": "login required" });
        assert_eq!(extract_video_url(&payload), None);
    }
}
