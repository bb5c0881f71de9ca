//! Locating http(s) URLs in free text.

use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(www\.)?[-a-z0-9@:%._+~#=]{1,256}\.[a-z0-9()]{1,6}\b([-a-z0-9@:%_+.~#?&/=]*)")
        .expect("invalid URL pattern")
});

/// Pattern matching http and https URLs.
pub fn url_pattern() -> &'static Regex {
    &URL_PATTERN
}

/// Every URL found in `text`, in order of appearance.
pub fn find_urls(text: &str) -> Vec<&str> {
    URL_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}
