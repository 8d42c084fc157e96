//! HTTP cache control module
//!
//! Revalidation against the deployed version token.

/// `Cache-Control` sent on every response: clients may store the bundle but
/// must revalidate before each use
pub const CACHE_CONTROL: &str = "no-cache";

/// Outcome of comparing the client's token with the deployed version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Client copy is current, answer 304
    Cached,
    /// Client copy is missing or stale, serve the file
    Served,
}

impl CacheOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cached => "CACHED",
            Self::Served => "SERVED",
        }
    }
}

impl std::fmt::Display for CacheOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether the client's `If-None-Match` value still matches
///
/// Comparison is exact byte equality with the version token: no quote
/// stripping, no list splitting, no wildcard. An empty value never matches
/// because a version token is never empty. Raw header bytes are compared, so
/// tokens outside visible ASCII still revalidate.
///
/// # Arguments
/// * `if_none_match` - Client-sent If-None-Match bytes, empty when absent
/// * `version` - Deployed version token
pub fn revalidate(if_none_match: &[u8], version: &str) -> CacheOutcome {
    if !if_none_match.is_empty() && if_none_match == version.as_bytes() {
        CacheOutcome::Cached
    } else {
        CacheOutcome::Served
    }
}

/// Human-readable token transition for logs, e.g. `v100 -> v123`
pub fn token_diff(if_none_match: &[u8], version: &str) -> String {
    format!("{} -> {version}", String::from_utf8_lossy(if_none_match))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_token_is_cached() {
        assert_eq!(revalidate(b"v123", "v123"), CacheOutcome::Cached);
    }

    #[test]
    fn test_non_ascii_token_is_cached() {
        assert_eq!(revalidate("v1-é".as_bytes(), "v1-é"), CacheOutcome::Cached);
        assert_eq!(revalidate("v1-e".as_bytes(), "v1-é"), CacheOutcome::Served);
    }

    #[test]
    fn test_stale_or_missing_token_is_served() {
        assert_eq!(revalidate(b"v100", "v123"), CacheOutcome::Served);
        assert_eq!(revalidate(b"", "v123"), CacheOutcome::Served);
    }

    #[test]
    fn test_no_etag_list_or_wildcard_semantics() {
        assert_eq!(revalidate(b"\"v123\"", "v123"), CacheOutcome::Served);
        assert_eq!(revalidate(b"v100, v123", "v123"), CacheOutcome::Served);
        assert_eq!(revalidate(b"*", "v123"), CacheOutcome::Served);
    }

    #[test]
    fn test_token_diff() {
        assert_eq!(token_diff(b"v100", "v123"), "v100 -> v123");
        assert_eq!(token_diff(b"", "v123"), " -> v123");
        assert_eq!(token_diff("v1-é".as_bytes(), "v1-é"), "v1-é -> v1-é");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(CacheOutcome::Cached.to_string(), "CACHED");
        assert_eq!(CacheOutcome::Served.as_str(), "SERVED");
    }
}
