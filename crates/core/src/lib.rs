//! Core types and shared functionality for scrapecache.
//!
//! This crate provides:
//! - The `ScrapedContent` record and its schema validation
//! - Cache adapter over a pluggable TTL key-value store
//! - Unified error types
//! - Configuration structures
//! - Tracing setup

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod telemetry;

pub use cache::{KvStore, MemoryStore, ScrapeCache, WriteOutcome};
pub use config::AppConfig;
pub use content::{Headings, ScrapedContent};
pub use error::Error;
