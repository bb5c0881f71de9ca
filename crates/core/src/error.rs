//! Unified error types for scrapecache.
//!
//! Every variant carries a stable code prefix in its display string so log
//! lines can be grepped by failure class.

use crate::config::ConfigError;
use crate::content::ValidationError;

/// Unified error type shared by the fetch, extract and cache layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Content extraction failed.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// Cache store unavailable or returned an error.
    #[error("CACHE_ERROR: {0}")]
    Store(String),

    /// Cache store rejected the credentials.
    #[error("CACHE_AUTH_ERROR: {0}")]
    StoreAuth(String),

    /// Stored value could not be decoded.
    #[error("CACHE_CORRUPT: {0}")]
    CorruptEntry(#[from] serde_json::Error),

    /// Value does not match the expected shape.
    #[error("CACHE_INVALID: {0}")]
    InvalidEntry(#[from] ValidationError),

    /// Serialized entry exceeds the store ceiling.
    #[error("CACHE_TOO_LARGE: {size} bytes exceeds {limit}")]
    EntryTooLarge { size: usize, limit: usize },

    /// Configuration missing or invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether this error happened while retrieving the page.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            Error::InvalidUrl(_) | Error::HttpError(_) | Error::FetchTimeout(_) | Error::FetchTooLarge(_)
        )
    }

    /// Whether this error came from the cache layer.
    pub fn is_cache(&self) -> bool {
        matches!(
            self,
            Error::Store(_)
                | Error::StoreAuth(_)
                | Error::CorruptEntry(_)
                | Error::InvalidEntry(_)
                | Error::EntryTooLarge { .. }
        )
    }
}
