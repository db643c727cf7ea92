//! Depth-bounded key search over decoded JSON payloads.

use serde_json::Value;

/// Maximum nesting depth visited before a branch is abandoned.
pub const MAX_SEARCH_DEPTH: usize = 64;

/// Finds the first non-empty string stored under `key`, depth-first.
///
/// Object members are visited in key order and arrays in index order.
/// Branches nested deeper than [`MAX_SEARCH_DEPTH`] are skipped, so
/// pathological payloads cannot exhaust the stack.
///
/// # Examples
///
/// ```ignore
/// let payload = json!({ "items": [{ "video_url": "https://cdn.example/a.mp4" }] });
/// assert_eq!(find_string_key(&payload, "video_url"), Some("https://cdn.example/a.mp4"));
/// ```
pub fn find_string_key<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    find_with_depth(value, key, 0)
}

/// Like [`find_string_key`] but tries each key in turn, returning the first hit.
pub fn find_first_of<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| find_string_key(value, key))
}

fn find_with_depth<'a>(value: &'a Value, key: &str, depth: usize) -> Option<&'a str> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }

    match value {
        Value::Object(map) => {
            if let Some(Value::String(found)) = map.get(key)
                && !found.trim().is_empty()
            {
                return Some(found.as_str());
            }
            map.values()
                .find_map(|child| find_with_depth(child, key, depth + 1))
        }
        Value::Array(items) => items
            .iter()
            .find_map(|child| find_with_depth(child, key, depth + 1)),
        _ => None,
    }
}

/// Walks a fixed path of object keys and array indices.
///
/// Path segments that parse as integers index into arrays; everything else
/// is an object key.
pub fn value_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Returns the non-empty string at `path`, if any.
pub fn string_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    value_at(value, path)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_top_level_key() {
        let payload = json!({ "video_url": "https://cdn.example/a.mp4" });
        assert_eq!(
            find_string_key(&payload, "video_url"),
            Some("https://cdn.example/a.mp4")
        );
    }

    #[test]
    fn test_find_nested_in_array() {
        let payload = json!({
            "items": [
                { "id": 1 },
                { "media": { "video_url": "https://cdn.example/b.mp4" } }
            ]
        });
        assert_eq!(
            find_string_key(&payload, "video_url"),
            Some("https://cdn.example/b.mp4")
        );
    }

    #[test]
    fn test_non_string_value_is_skipped() {
        let payload = json!({
            "video_url": null,
            "nested": { "video_url": "https://cdn.example/c.mp4" }
        });
        assert_eq!(
            find_string_key(&payload, "video_url"),
            Some("https://cdn.example/c.mp4")
        );
    }

    #[test]
    fn test_missing_key() {
        let payload = json!({ "a": [1, 2, { "b": "c" }] });
        assert_eq!(find_string_key(&payload, "video_url"), None);
    }

    #[test]
    fn test_depth_bound_stops_descent() {
        let mut payload = json!({ "video_url": "https://cdn.example/deep.mp4" });
        for _ in 0..(MAX_SEARCH_DEPTH + 10) {
            payload = json!({ "child": payload });
        }
        assert_eq!(find_string_key(&payload, "video_url"), None);
    }

    #[test]
    fn test_find_first_of_respects_key_order() {
        let payload = json!({
            "download_url": "https://cdn.example/d.mp4",
            "deep": { "video_url": "https://cdn.example/v.mp4" }
        });
        assert_eq!(
            find_first_of(&payload, &["video_url", "download_url"]),
            Some("https://cdn.example/v.mp4")
        );
    }

    #[test]
    fn test_string_at_walks_arrays() {
        let payload = json!({ "edges": [{ "node": { "video_url": "x" } }] });
        assert_eq!(string_at(&payload, &["edges", "0", "node", "video_url"]), Some("x"));
        assert_eq!(string_at(&payload, &["edges", "1", "node", "video_url"]), None);
    }
}
