//! Reference parsing: turns an inbound post link into a canonical shortcode.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Matches the first `/reel/<id>` or `/p/<id>` path segment.
static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(reel|p)/([A-Za-z0-9_-]+)").unwrap());

/// Errors produced when a reference has no recognizable post segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Reference is empty")]
    Empty,

    #[error("Reference does not contain a /reel/<id> or /p/<id> segment: {0}")]
    UnrecognizedShape(String),
}

/// Which path segment the shortcode was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Reel,
    Post,
}

impl PostKind {
    /// Path segment used when rebuilding a canonical document URL.
    pub fn path_segment(self) -> &'static str {
        match self {
            PostKind::Reel => "reel",
            PostKind::Post => "p",
        }
    }
}

/// Short alphanumeric post identifier (`[A-Za-z0-9_-]+`, never empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcode(String);

impl Shortcode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Shortcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed reference, scoped to a single resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReference {
    raw: String,
    kind: PostKind,
    shortcode: Shortcode,
}

impl PostReference {
    /// The reference exactly as the caller supplied it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> PostKind {
        self.kind
    }

    pub fn shortcode(&self) -> &Shortcode {
        &self.shortcode
    }

    /// Builds `{base}/{kind}/{shortcode}/` against a configured web host.
    pub fn canonical_url(&self, base: &str) -> String {
        format!(
            "{}/{}/{}/",
            base.trim_end_matches('/'),
            self.kind.path_segment(),
            self.shortcode
        )
    }
}

/// Extracts the shortcode from a reference string.
///
/// Accepts anything containing a `/reel/<id>` or `/p/<id>` segment; the first
/// matching segment wins. Performs no I/O.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for blank input and
/// [`ParseError::UnrecognizedShape`] when no post segment is present.
///
/// # Examples
///
/// ```ignore
/// let reference = parse("https://www.instagram.com/reel/ABC123/?igsh=x").unwrap();
/// assert_eq!(reference.shortcode().as_str(), "ABC123");
/// ```
pub fn parse(reference: &str) -> Result<PostReference, ParseError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let captures = REFERENCE_REGEX
        .captures(trimmed)
        .ok_or_else(|| ParseError::UnrecognizedShape(trimmed.to_string()))?;

    let kind = match &captures[1] {
        "reel" => PostKind::Reel,
        _ => PostKind::Post,
    };

    Ok(PostReference {
        raw: trimmed.to_string(),
        kind,
        shortcode: Shortcode(captures[2].to_string()),
    })
}
