//! Client code for scrapecache.
//!
//! This crate provides the HTTP fetch client, content extraction, the REST
//! cache store and the cache-first `Scraper` built from them.

pub mod extract;
pub mod fetch;
pub mod scrape;
pub mod store;
pub mod urls;

pub use extract::{ContentExtractor, ExtractConfig, Extractor, Region, normalize_text, truncate_chars};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, Fetcher};
pub use scrape::Scraper;
pub use store::{RestConfig, RestStore};
pub use urls::find_urls;
