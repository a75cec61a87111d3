//! Conditional request support
//!
//! `ETag` generation and `If-None-Match` evaluation so unchanged assets
//! can be answered with 304 instead of a full body.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a quoted `ETag` for a file's content.
///
/// The tag combines content length and a content hash, so files of the
/// same size with different bytes still get distinct tags.
pub fn etag_for(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Evaluate a client's `If-None-Match` header against the current `ETag`.
///
/// Handles the comma-separated list form and the `*` wildcard.
/// Returns true when the client's copy is current (respond 304).
pub fn none_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == "*" || candidate == etag)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_quoted_and_stable() {
        let a = etag_for(b"shell page");
        let b = etag_for(b"shell page");
        assert_eq!(a, b);
        assert!(a.starts_with('"') && a.ends_with('"'));
    }

    #[test]
    fn test_etag_distinguishes_content() {
        assert_ne!(etag_for(b"aaaa"), etag_for(b"bbbb"));
    }

    #[test]
    fn test_none_match() {
        let etag = "\"10-deadbeef\"";
        assert!(none_match(Some("\"10-deadbeef\""), etag));
        assert!(none_match(Some("\"other\", \"10-deadbeef\""), etag));
        assert!(none_match(Some("*"), etag));
        assert!(!none_match(Some("\"stale\""), etag));
        assert!(!none_match(None, etag));
    }
}
