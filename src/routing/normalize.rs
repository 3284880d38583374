//! Path canonicalization.
//!
//! # Rules
//! - Everything from the first `#` is dropped, then everything from the first `?`
//! - `"/"` stays `"/"`
//! - Trailing slashes are removed from every other path
//! - No case folding, no percent-decoding (exact comparison keys only)

/// Canonicalize a URL path into a comparison key.
///
/// Never fails: input that reduces to nothing yields `""`.
pub fn normalize_path(path: &str) -> String {
    let without_fragment = path.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();

    if without_query.is_empty() {
        return String::new();
    }

    let trimmed = without_query.trim_end_matches('/');
    if trimmed.is_empty() {
        // Only slashes were left, which collapses to the root.
        return "/".to_string();
    }

    trimmed.to_string()
}

/// Trim a lookup key, returning `None` when nothing usable is left.
pub fn normalize_key(key: &str) -> Option<&str> {
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}
