//! Cache-first page scraping.
//!
//! `Scraper::scrape` looks the URL up in the cache, and on a miss fetches the
//! page, extracts its text and writes the result back. It never returns an
//! error: a failed fetch or extraction yields [`ScrapedContent::failed`], and
//! cache failures only show up in the logs.

use std::sync::Arc;

use scrapecache_core::cache::{ScrapeCache, WriteOutcome};
use scrapecache_core::{AppConfig, Error, ScrapedContent};

use crate::extract::{ContentExtractor, ExtractConfig, Extractor};
use crate::fetch::{FetchClient, FetchConfig, Fetcher};
use crate::store::{RestConfig, RestStore};

/// Fetch-extract-cache pipeline.
#[derive(Clone)]
pub struct Scraper {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    cache: ScrapeCache,
}

impl Scraper {
    /// Create a scraper using the default [`ContentExtractor`].
    pub fn new(fetcher: Arc<dyn Fetcher>, cache: ScrapeCache) -> Self {
        Self { fetcher, extractor: Arc::new(ContentExtractor::default()), cache }
    }

    /// Replace the extraction engine.
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Wire a scraper from loaded configuration: reqwest fetcher, REST store.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the store credentials are missing, or an
    /// error if either HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let store = RestStore::new(RestConfig::from_app_config(config)?)?;
        let cache = ScrapeCache::with_settings(Arc::new(store), config.cache_settings());
        let fetcher = FetchClient::new(FetchConfig::from(config))?;

        Ok(Self::new(Arc::new(fetcher), cache)
            .with_extractor(Arc::new(ContentExtractor::new(ExtractConfig::from(config)))))
    }

    pub fn cache(&self) -> &ScrapeCache {
        &self.cache
    }

    /// Scraped content for `url`, served from the cache when present.
    pub async fn scrape(&self, url: &str) -> ScrapedContent {
        tracing::info!(url, "starting scrape");

        if let Some(cached) = self.cache.get(url).await {
            tracing::info!(url, "returning cached content");
            return cached;
        }

        tracing::info!(url, "cache miss, scraping fresh");
        self.scrape_and_store(url).await
    }

    /// Scrape `url` without consulting the cache, overwriting any entry.
    pub async fn refresh(&self, url: &str) -> ScrapedContent {
        tracing::info!(url, "refreshing scrape");
        self.scrape_and_store(url).await
    }

    async fn scrape_and_store(&self, url: &str) -> ScrapedContent {
        let content = match self.fetch_and_extract(url).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(url, error = %e, "error scraping");
                return ScrapedContent::failed(url);
            }
        };

        if let WriteOutcome::Skipped(e) = self.cache.set(url, &content).await {
            tracing::debug!(url, reason = %e, "scraped content not cached");
        }

        content
    }

    async fn fetch_and_extract(&self, url: &str) -> Result<ScrapedContent, Error> {
        let response = self.fetcher.fetch(url).await?;
        self.extractor.extract(url, &response.text())
    }
}
