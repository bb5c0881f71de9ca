//! TTL-bounded cache of scraped pages.
//!
//! This module provides a cache over any key-value store with expiring keys.
//! It supports:
//!
//! - Namespaced keys derived from the page URL
//! - Schema validation of every entry read or written
//! - Self-healing: corrupt entries are deleted on read
//! - A hard ceiling on serialized entry size

pub mod adapter;
pub mod key;
pub mod store;

pub use crate::Error;

pub use adapter::{CacheSettings, DEFAULT_TTL, MAX_ENTRY_BYTES, ScrapeCache, WriteOutcome};
pub use key::cache_key;
pub use store::{KvStore, MemoryStore};
