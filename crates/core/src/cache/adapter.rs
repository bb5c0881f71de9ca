//! Scrape cache adapter over a [`KvStore`].
//!
//! Reads and writes never surface errors: a failed or corrupt read is a miss
//! and a failed write is reported as [`WriteOutcome::Skipped`].

use super::key::cache_key;
use super::store::KvStore;
use crate::Error;
use crate::content::{ScrapedContent, validate_value};
use std::sync::Arc;
use std::time::Duration;

/// Lifetime of a cache entry (7 days).
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Largest serialized entry the cache will write (1 MiB).
pub const MAX_ENTRY_BYTES: usize = 1_048_576;

/// Tunables for the cache adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_entry_bytes: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL, max_entry_bytes: MAX_ENTRY_BYTES }
    }
}

/// Result of a best-effort cache write.
#[derive(Debug)]
pub enum WriteOutcome {
    /// The entry was written; `bytes` is its serialized size.
    Stored { bytes: usize },
    /// Nothing was written.
    Skipped(Error),
}

impl WriteOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, WriteOutcome::Stored { .. })
    }
}

/// Cache of scraped pages keyed by URL.
#[derive(Clone)]
pub struct ScrapeCache {
    store: Arc<dyn KvStore>,
    settings: CacheSettings,
}

impl ScrapeCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_settings(store, CacheSettings::default())
    }

    pub fn with_settings(store: Arc<dyn KvStore>, settings: CacheSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Look up the cached content for `url`.
    ///
    /// Store failures are logged and treated as a miss. An entry that does not
    /// decode, or decodes to the wrong shape, is deleted before returning `None`
    /// so it cannot be served again.
    pub async fn get(&self, url: &str) -> Option<ScrapedContent> {
        let key = cache_key(url);
        tracing::debug!(key = %key, "checking cache");

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!(url, "cache miss");
                return None;
            }
            Err(e) => {
                tracing::error!(url, error = %e, "cache retrieval error");
                return None;
            }
        };

        match decode_entry(&raw) {
            Ok(content) => {
                let age_ms = chrono::Utc::now().timestamp_millis().saturating_sub(content.cached_at.unwrap_or(0));
                tracing::info!(url, age_minutes = age_ms / 1000 / 60, "cache hit");
                Some(content)
            }
            Err(e) => {
                match &e {
                    Error::InvalidEntry(_) => tracing::warn!(url, error = %e, "invalid cached content format"),
                    _ => tracing::error!(url, error = %e, "failed to decode cached content"),
                }
                self.evict(&key).await;
                None
            }
        }
    }

    /// Write `content` for `url`, stamped with the current time.
    ///
    /// The entry is skipped if it fails validation, if its serialized form is
    /// larger than `max_entry_bytes`, or if the store rejects the write.
    pub async fn set(&self, url: &str, content: &ScrapedContent) -> WriteOutcome {
        match self.try_set(url, content).await {
            Ok(bytes) => {
                tracing::info!(url, bytes, ttl_secs = self.settings.ttl.as_secs(), "cached content");
                WriteOutcome::Stored { bytes }
            }
            Err(e) => {
                match &e {
                    Error::EntryTooLarge { size, .. } => {
                        tracing::warn!(url, bytes = size, "content too large to cache")
                    }
                    Error::InvalidEntry(_) => tracing::error!(url, error = %e, "refusing to cache invalid content"),
                    _ => tracing::error!(url, error = %e, "cache storage error"),
                }
                WriteOutcome::Skipped(e)
            }
        }
    }

    /// Delete the entry for `url`. Returns whether the store accepted the delete.
    pub async fn invalidate(&self, url: &str) -> bool {
        self.evict(&cache_key(url)).await
    }

    async fn try_set(&self, url: &str, content: &ScrapedContent) -> Result<usize, Error> {
        let key = cache_key(url);

        let mut entry = content.clone();
        entry.cached_at = Some(chrono::Utc::now().timestamp_millis());

        let value = serde_json::to_value(&entry)?;
        validate_value(&value)?;

        let serialized = value.to_string();
        if serialized.len() > self.settings.max_entry_bytes {
            return Err(Error::EntryTooLarge { size: serialized.len(), limit: self.settings.max_entry_bytes });
        }

        self.store.set(&key, &serialized, self.settings.ttl).await?;
        Ok(serialized.len())
    }

    async fn evict(&self, key: &str) -> bool {
        match self.store.del(key).await {
            Ok(()) => {
                tracing::debug!(key, "evicted cache entry");
                true
            }
            Err(e) => {
                tracing::error!(key, error = %e, "failed to delete cache entry");
                false
            }
        }
    }
}

fn decode_entry(raw: &str) -> Result<ScrapedContent, Error> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    ScrapedContent::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryStore;
    use crate::content::Headings;
    use async_trait::async_trait;

    fn make_content(url: &str) -> ScrapedContent {
        ScrapedContent {
            url: url.to_string(),
            title: "Hello".to_string(),
            headings: Headings { h1: "World".to_string(), h2: "Intro Details".to_string() },
            meta_description: "A test page".to_string(),
            content: "Hello A test page World Intro Details".to_string(),
            error: None,
            cached_at: None,
        }
    }

    fn make_cache() -> (MemoryStore, ScrapeCache) {
        let store = MemoryStore::new();
        let cache = ScrapeCache::new(Arc::new(store.clone()));
        (store, cache)
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl KvStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, Error> {
            Err(Error::Store("connection refused".into()))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), Error> {
            Err(Error::Store("connection refused".into()))
        }

        async fn del(&self, _key: &str) -> Result<(), Error> {
            Err(Error::Store("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (_, cache) = make_cache();
        let content = make_content("https://example.com");

        let outcome = cache.set(&content.url, &content).await;
        assert!(outcome.is_stored());

        let cached = cache.get(&content.url).await.unwrap();
        assert!(cached.cached_at.is_some());
        assert_eq!(ScrapedContent { cached_at: None, ..cached }, content);
    }

    #[tokio::test]
    async fn test_set_stamps_cached_at() {
        let (_, cache) = make_cache();
        let before = chrono::Utc::now().timestamp_millis();
        cache.set("https://example.com", &make_content("https://example.com")).await;
        let after = chrono::Utc::now().timestamp_millis();

        let stamp = cache.get("https://example.com").await.unwrap().cached_at.unwrap();
        assert!(stamp >= before && stamp <= after);
    }

    #[tokio::test]
    async fn test_set_writes_under_namespaced_key() {
        let (store, cache) = make_cache();
        cache.set("https://example.com", &make_content("https://example.com")).await;
        assert!(store.contains_key("scrape: https://example.com").await);
    }

    #[tokio::test]
    async fn test_get_miss() {
        let (_, cache) = make_cache();
        assert!(cache.get("https://example.com/missing").await.is_none());
    }

    #[tokio::test]
    async fn test_oversize_entry_skipped() {
        let (store, cache) = make_cache();
        let mut content = make_content("https://example.com/big");
        content.content = "x".repeat(MAX_ENTRY_BYTES + 1);

        let outcome = cache.set(&content.url, &content).await;
        assert!(matches!(outcome, WriteOutcome::Skipped(Error::EntryTooLarge { limit: MAX_ENTRY_BYTES, .. })));
        assert!(store.is_empty().await);
        assert!(cache.get(&content.url).await.is_none());
    }

    #[tokio::test]
    async fn test_custom_size_ceiling() {
        let store = MemoryStore::new();
        let settings = CacheSettings { max_entry_bytes: 64, ..Default::default() };
        let cache = ScrapeCache::with_settings(Arc::new(store.clone()), settings);

        let outcome = cache.set("https://example.com", &make_content("https://example.com")).await;
        assert!(!outcome.is_stored());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_json_deleted() {
        let (store, cache) = make_cache();
        let key = cache_key("https://example.com");
        store.set(&key, "{not json", DEFAULT_TTL).await.unwrap();

        assert!(cache.get("https://example.com").await.is_none());
        assert!(!store.contains_key(&key).await);
    }

    #[tokio::test]
    async fn test_missing_headings_deleted() {
        let (store, cache) = make_cache();
        let key = cache_key("https://example.com");
        let malformed = serde_json::json!({
            "url": "https://example.com",
            "title": "Hello",
            "metaDescription": "",
            "content": "Hello",
            "error": null
        });
        store.set(&key, &malformed.to_string(), DEFAULT_TTL).await.unwrap();

        assert!(cache.get("https://example.com").await.is_none());
        assert!(!store.contains_key(&key).await);
    }

    #[tokio::test]
    async fn test_extreme_cached_at_is_served() {
        let (store, cache) = make_cache();
        for stamp in [i64::MIN, i64::MAX] {
            let mut value = serde_json::to_value(make_content("https://example.com")).unwrap();
            value["cachedAt"] = serde_json::json!(stamp);
            store.set(&cache_key("https://example.com"), &value.to_string(), DEFAULT_TTL).await.unwrap();

            let cached = cache.get("https://example.com").await.unwrap();
            assert_eq!(cached.cached_at, Some(stamp));
        }
    }

    #[tokio::test]
    async fn test_store_errors_are_soft() {
        let cache = ScrapeCache::new(Arc::new(BrokenStore));
        assert!(cache.get("https://example.com").await.is_none());

        let outcome = cache.set("https://example.com", &make_content("https://example.com")).await;
        assert!(matches!(outcome, WriteOutcome::Skipped(Error::Store(_))));
        assert!(!cache.invalidate("https://example.com").await);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let (store, cache) = make_cache();
        cache.set("https://example.com", &make_content("https://example.com")).await;
        assert!(cache.invalidate("https://example.com").await);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let (_, cache) = make_cache();
        cache.set("https://example.com", &make_content("https://example.com")).await;

        tokio::time::advance(DEFAULT_TTL - Duration::from_secs(1)).await;
        assert!(cache.get("https://example.com").await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("https://example.com").await.is_none());
    }
}
