//! Whitespace normalization and length capping for extracted text.

/// Collapse every whitespace run (spaces, tabs, newlines) to a single space
/// and trim both ends.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters of `text`.
///
/// Cuts on `char` boundaries, so a multi-byte character is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
