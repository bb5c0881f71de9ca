//! Cache key derivation.

/// Namespace prefix separating scrape entries from other store consumers.
pub const KEY_PREFIX: &str = "scrape: ";

/// Number of URL characters kept in a key.
pub const MAX_KEY_URL_CHARS: usize = 200;

/// Compute the store key for a URL.
///
/// The URL is cut to its first 200 characters (not bytes) so keys stay
/// bounded; URLs sharing that prefix share an entry.
pub fn cache_key(url: &str) -> String {
    let truncated: String = url.chars().take(MAX_KEY_URL_CHARS).collect();
    format!("{KEY_PREFIX}{truncated}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        assert_eq!(cache_key("https://example.com"), cache_key("https://example.com"));
    }

    #[test]
    fn test_key_format() {
        assert_eq!(cache_key("https://example.com/a"), "scrape: https://example.com/a");
    }

    #[test]
    fn test_key_no_canonicalization() {
        assert_ne!(cache_key("https://example.com"), cache_key("https://example.com/"));
    }

    #[test]
    fn test_key_truncates_long_urls() {
        let long = format!("https://example.com/{}", "a".repeat(500));
        let key = cache_key(&long);
        assert_eq!(key.len(), KEY_PREFIX.len() + MAX_KEY_URL_CHARS);
        assert!(long.starts_with(&key[KEY_PREFIX.len()..]));
    }

    #[test]
    fn test_key_shared_prefix_collides() {
        let base = format!("https://example.com/{}", "b".repeat(200));
        assert_eq!(cache_key(&format!("{base}/one")), cache_key(&format!("{base}/two")));
    }

    #[test]
    fn test_key_truncates_on_char_boundary() {
        let url = format!("https://example.com/{}", "é".repeat(300));
        let key = cache_key(&url);
        assert_eq!(key.chars().count(), KEY_PREFIX.len() + MAX_KEY_URL_CHARS);
    }
}
