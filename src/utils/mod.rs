//! Response extraction helpers shared by the strategies.
//!
//! - [`url_cleanup`] - Unescaping and decoding of candidate URLs
//! - [`json_search`] - Depth-bounded key search and path accessors over JSON
//! - [`media_extract`] - Regex and DOM pattern sets over raw documents

pub mod json_search;
pub mod media_extract;
pub mod url_cleanup;
