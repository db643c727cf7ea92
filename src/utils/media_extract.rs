//! Pattern sets for pulling a media URL out of raw documents.
//!
//! Every candidate goes through [`clean_url`] and is accepted only when the
//! [`MediaFilter`] considers it a plausible media asset.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

use super::json_search::find_string_key;
use super::url_cleanup::clean_url;

/// `"video_url":"..."` as it appears in embedded JSON.
static QUOTED_VIDEO_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""video_url"\s*:\s*"([^"]+)""#).unwrap());

/// Looser form tolerating single quotes and unquoted keys.
static LOOSE_VIDEO_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"video_url["']?\s*:\s*["']([^"']+)["']"#).unwrap());

/// `og:video` meta tag with the content attribute following the property.
static OG_VIDEO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)og:video(?::secure_url|:url)?["']?\s*content=["']([^"']+)["']"#).unwrap()
});

/// Any absolute URL ending in a media file extension.
static GENERIC_MEDIA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>]+?\.(?:mp4|m3u8|mov|webm|m4v)(?:\?[^\s"'<>]*)?"#).unwrap()
});

const MEDIA_EXTENSIONS: &[&str] = &[".mp4", ".m3u8", ".mov", ".webm", ".m4v"];

/// Decides whether a cleaned candidate plausibly denotes a media asset.
///
/// A candidate must be an absolute http(s) URL whose path carries a media
/// extension or whose host belongs to one of the configured media domains.
#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    hosts: Vec<String>,
}

impl MediaFilter {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.into().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    pub fn is_plausible(&self, candidate: &str) -> bool {
        let Ok(url) = Url::parse(candidate) else {
            return false;
        };
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        let path = url.path().to_ascii_lowercase();
        if MEDIA_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            return true;
        }

        let Some(host) = url.host_str().map(str::to_ascii_lowercase) else {
            return false;
        };
        self.hosts
            .iter()
            .any(|allowed| host == *allowed || host.ends_with(&format!(".{allowed}")))
    }

    fn accept(&self, raw: &str) -> Option<String> {
        let cleaned = clean_url(raw);
        self.is_plausible(&cleaned).then_some(cleaned)
    }
}

/// Extracts a media URL from an HTML document.
///
/// # Extraction Order
///
/// 1. `src` of a `<video>` element or its `<source>` children
/// 2. Text patterns over the raw document: quoted `video_url` fields,
///    `og:video` meta content, then embedded JSON scripts with a `video_url` key
/// 3. Visible text tokens ending in a media extension
///
/// The first candidate accepted by `filter` wins.
pub fn extract_from_html(html: &str, filter: &MediaFilter) -> Option<String> {
    let document = Html::parse_document(html);

    video_element_source(&document, filter)
        .or_else(|| first_pattern_match(&QUOTED_VIDEO_URL_REGEX, html, filter))
        .or_else(|| first_pattern_match(&LOOSE_VIDEO_URL_REGEX, html, filter))
        .or_else(|| og_video_content(&document, html, filter))
        .or_else(|| embedded_json_video_url(&document, filter))
        .or_else(|| visible_text_media(&document, filter))
}

/// Applies the quoted `video_url` pattern to an opaque text body.
///
/// Returns the first match after cleanup without host filtering, since the
/// key itself already names a video.
pub fn extract_video_url_field(text: &str) -> Option<String> {
    QUOTED_VIDEO_URL_REGEX
        .captures_iter(text)
        .chain(LOOSE_VIDEO_URL_REGEX.captures_iter(text))
        .map(|caps| clean_url(&caps[1]))
        .find(|url| !url.is_empty())
}

fn first_pattern_match(pattern: &Regex, text: &str, filter: &MediaFilter) -> Option<String> {
    pattern
        .captures_iter(text)
        .find_map(|caps| filter.accept(&caps[1]))
}

fn video_element_source(document: &Html, filter: &MediaFilter) -> Option<String> {
    let selector = Selector::parse("video[src], video source[src]").ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("src"))
        .find_map(|src| filter.accept(src))
}

fn og_video_content(document: &Html, html: &str, filter: &MediaFilter) -> Option<String> {
    if let Ok(selector) = Selector::parse(
        r#"meta[property="og:video"], meta[property="og:video:secure_url"], meta[property="og:video:url"]"#,
    ) && let Some(found) = document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .find_map(|content| filter.accept(content))
    {
        return Some(found);
    }

    first_pattern_match(&OG_VIDEO_REGEX, html, filter)
}

fn embedded_json_video_url(document: &Html, filter: &MediaFilter) -> Option<String> {
    let selector = Selector::parse("script").ok()?;
    document.select(&selector).find_map(|script| {
        let body: String = script.text().collect();
        if !body.contains("video_url") {
            return None;
        }
        let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
        find_string_key(&value, "video_url").and_then(|found| filter.accept(found))
    })
}

fn visible_text_media(document: &Html, filter: &MediaFilter) -> Option<String> {
    let selector = Selector::parse("body").ok()?;
    let body = document.select(&selector).next()?;

    body.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
            (!hidden).then_some(text)
        })
        .find_map(|text| {
            GENERIC_MEDIA_REGEX
                .find_iter(text)
                .find_map(|m| filter.accept(m.as_str()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> MediaFilter {
        MediaFilter::new(["cdninstagram.com", "fbcdn.net"])
    }

    #[test]
    fn test_filter_accepts_media_extension() {
        assert!(filter().is_plausible("https://cdn.example/x.mp4"));
        assert!(filter().is_plausible("https://cdn.example/x.MP4?sig=1"));
    }

    #[test]
    fn test_filter_accepts_media_host() {
        assert!(filter().is_plausible("https://scontent-ams2-1.cdninstagram.com/v/t50/abc"));
        assert!(filter().is_plausible("https://fbcdn.net/v/abc"));
    }

    #[test]
    fn test_filter_rejects_other_urls() {
        assert!(!filter().is_plausible("https://example.com/page.html"));
        assert!(!filter().is_plausible("javascript:alert(1).mp4"));
        assert!(!filter().is_plausible("not a url"));
        assert!(!filter().is_plausible("https://evilcdninstagram.com/x"));
    }

    #[test]
    fn test_extract_quoted_video_url() {
        let html = r#"<html><script>window.data = {"video_url":"https://cdn.example/x.mp4"};</script></html>"#;
        assert_eq!(
            extract_from_html(html, &filter()),
            Some("https://cdn.example/x.mp4".to_string())
        );
    }

    #[test]
    fn test_extract_video_element_wins() {
        let html = r#"<html><body>
            <video src="https://cdn.example/element.mp4"></video>
            <script>{"video_url":"https://cdn.example/script.mp4"}</script>
        </body></html>"#;
        assert_eq!(
            extract_from_html(html, &filter()),
            Some("https://cdn.example/element.mp4".to_string())
        );
    }

    #[test]
    fn test_extract_video_source_child() {
        let html = r#"<video><source src="https://cdn.example/child.webm" type="video/webm"></video>"#;
        assert_eq!(
            extract_from_html(html, &filter()),
            Some("https://cdn.example/child.webm".to_string())
        );
    }

    #[test]
    fn test_extract_og_video_any_attribute_order() {
        let html = r#"<head><meta content="https://cdn.example/og.mp4" property="og:video"></head>"#;
        assert_eq!(
            extract_from_html(html, &filter()),
            Some("https://cdn.example/og.mp4".to_string())
        );
    }

    #[test]
    fn test_extract_og_video_regex_fallback() {
        let html = r#"<meta property='og:video' content='https://cdn.example/og2.mp4'/>"#;
        assert_eq!(
            extract_from_html(html, &filter()),
            Some("https://cdn.example/og2.mp4".to_string())
        );
    }

    #[test]
    fn test_extract_skips_implausible_candidate() {
        let html = r#"<script>{"video_url":"https://example.com/not-media"}</script>
            <meta property="og:video" content="https://cdn.example/ok.mp4">"#;
        assert_eq!(
            extract_from_html(html, &filter()),
            Some("https://cdn.example/ok.mp4".to_string())
        );
    }

    #[test]
    fn test_extract_visible_text_fallback() {
        let html = r#"<html><body><p>Download: https://cdn.example/clip.mov?dl=1 now</p></body></html>"#;
        assert_eq!(
            extract_from_html(html, &filter()),
            Some("https://cdn.example/clip.mov?dl=1".to_string())
        );
    }

    #[test]
    fn test_extract_ignores_script_text_in_visible_scan() {
        let html = r#"<html><body><script>var u = "https://cdn.example/hidden.mp4";</script></body></html>"#;
        assert_eq!(extract_from_html(html, &filter()), None);
    }

    #[test]
    fn test_extract_nothing() {
        let html = "<html><body><p>Log in to continue</p></body></html>";
        assert_eq!(extract_from_html(html, &filter()), None);
    }

    #[test]
    fn test_extract_video_url_field_from_text() {
        let body = r#"for (;;);{"items":[{"video_url":"https://cdn.example/t.mp4"}]}"#;
        assert_eq!(
            extract_video_url_field(body),
            Some("https://cdn.example/t.mp4".to_string())
        );
        assert_eq!(extract_video_url_field("nothing here"), None);
    }

    #[test]
    fn test_extract_unescapes_json_slashes() {
        let html = r#"<html><script>{"video_url":"https:\/\/scontent.cdninstagram.com\/v\/clip.mp4"}</script></html>"#;
        assert_eq!(
            extract_from_html(html, &filter()),
            Some("https://scontent.cdninstagram.com/v/clip.mp4".to_string())
        );
    }
}
