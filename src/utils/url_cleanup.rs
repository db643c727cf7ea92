//! Cleanup of media URLs lifted out of HTML, JSON or script bodies.

use regex::Regex;
use std::sync::LazyLock;

static PERCENT_ESCAPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[0-9A-Fa-f]{2}").unwrap());

/// JSON-escaped slashes, including runs of backslashes before one slash.
static ESCAPED_SLASH_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\+/").unwrap());

/// Cleans a raw candidate URL.
///
/// # Cleanup Rules
///
/// 1. **Percent-decoding**: applied once; the original string is kept when
///    decoding fails or the decoded text still holds escapes (double encoding)
/// 2. **Unicode escapes**: literal `\u0026` sequences become `&`
/// 3. **Escaped slashes**: `\/` (and any backslash run before a `/`) becomes `/`
/// 4. **Leading escapes**: leading `\` characters and surrounding whitespace
///    are stripped
///
/// The transform is idempotent: `clean_url(&clean_url(x)) == clean_url(x)`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     clean_url(r"\https://cdn.example/v.mp4?a=1\u0026b=2"),
///     "https://cdn.example/v.mp4?a=1&b=2"
/// );
/// ```
pub fn clean_url(raw: &str) -> String {
    let decoded = percent_decode_once(raw.trim());
    let unescaped = decoded.replace(r"\u0026", "&");
    ESCAPED_SLASH_REGEX
        .replace_all(&unescaped, "/")
        .trim_start_matches(|c: char| c == '\\' || c.is_whitespace())
        .trim_end()
        .to_string()
}

fn percent_decode_once(input: &str) -> String {
    if !PERCENT_ESCAPE_REGEX.is_match(input) {
        return input.to_string();
    }

    match urlencoding::decode(input) {
        Ok(decoded) if !PERCENT_ESCAPE_REGEX.is_match(&decoded) => decoded.into_owned(),
        _ => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_plain_url_unchanged() {
        assert_eq!(
            clean_url("https://cdn.example/x.mp4"),
            "https://cdn.example/x.mp4"
        );
    }

    #[test]
    fn test_clean_strips_leading_escape() {
        assert_eq!(
            clean_url(r"\https://cdn.example/x.mp4"),
            "https://cdn.example/x.mp4"
        );
    }

    #[test]
    fn test_clean_unescapes_ampersand() {
        assert_eq!(
            clean_url(r"https://cdn.example/x.mp4?a=1\u0026b=2"),
            "https://cdn.example/x.mp4?a=1&b=2"
        );
    }

    #[test]
    fn test_clean_unescapes_json_slashes() {
        assert_eq!(
            clean_url(r"https:\/\/scontent.cdninstagram.com\/v\/clip.mp4"),
            "https://scontent.cdninstagram.com/v/clip.mp4"
        );
        assert_eq!(
            clean_url(r"https://cdn.example/a\\/b.mp4"),
            "https://cdn.example/a/b.mp4"
        );
    }

    #[test]
    fn test_clean_percent_decodes() {
        assert_eq!(
            clean_url("https%3A%2F%2Fcdn.example%2Fx.mp4"),
            "https://cdn.example/x.mp4"
        );
    }

    #[test]
    fn test_clean_keeps_invalid_utf8_escape() {
        assert_eq!(
            clean_url("https://cdn.example/%FF.mp4"),
            "https://cdn.example/%FF.mp4"
        );
    }

    #[test]
    fn test_clean_keeps_double_encoded() {
        assert_eq!(
            clean_url("https://cdn.example/a%2541.mp4"),
            "https://cdn.example/a%2541.mp4"
        );
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = [
            "https://cdn.example/x.mp4",
            r"\https://cdn.example/x.mp4?a=1\u0026b=2",
            r"\\\https://cdn.example/x.mp4",
            "https%3A%2F%2Fcdn.example%2Fx.mp4%3Fa%3D1",
            "https://cdn.example/a%2541.mp4",
            "https://cdn.example/%FF.mp4",
            "%5Chttps://cdn.example/x.mp4",
            r"%5Cu0026tail",
            "  https://cdn.example/x.mp4  ",
            "%20%5C https://cdn.example/x.mp4",
            r"https:\/\/scontent.cdninstagram.com\/v\/clip.mp4",
            r"a\\/b\\\/c",
            "%5C/%5C%5C/tail",
            "",
        ];

        for sample in samples {
            let once = clean_url(sample);
            let twice = clean_url(&once);
            assert_eq!(once, twice, "cleanup not idempotent for {sample:?}");
        }
    }
}
