//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SCRAPECACHE_*)
//! 2. Upstash credentials (UPSTASH_REDIS_REST_URL, UPSTASH_REDIS_REST_TOKEN)
//! 3. TOML config file (if SCRAPECACHE_CONFIG_FILE set)
//! 4. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheSettings, DEFAULT_TTL, MAX_ENTRY_BYTES};

mod validation;

pub use validation::ConfigError;

/// Default cap on the combined `content` field, in characters.
pub const MAX_CONTENT_CHARS: usize = 50_000;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST endpoint of the remote cache store.
    ///
    /// Set via SCRAPECACHE_STORE_URL or UPSTASH_REDIS_REST_URL.
    #[serde(default)]
    pub store_url: Option<String>,

    /// Access token for the remote cache store.
    ///
    /// Set via SCRAPECACHE_STORE_TOKEN or UPSTASH_REDIS_REST_TOKEN.
    #[serde(default)]
    pub store_token: Option<String>,

    /// User-Agent string for page fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum page body bytes to accept.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Lifetime of a cache entry in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Largest serialized entry the cache will write.
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: usize,

    /// Cap on the combined `content` field.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_user_agent() -> String {
    "scrapecache/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn default_max_entry_bytes() -> usize {
    MAX_ENTRY_BYTES
}

fn default_max_content_chars() -> usize {
    MAX_CONTENT_CHARS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_url: None,
            store_token: None,
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_entry_bytes: default_max_entry_bytes(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache behaviour derived from this configuration.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings { ttl: Duration::from_secs(self.cache_ttl_secs), max_entry_bytes: self.max_entry_bytes }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SCRAPECACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment
            .merge(Env::raw().only(&["UPSTASH_REDIS_REST_URL", "UPSTASH_REDIS_REST_TOKEN"]).map(|key| {
                if key.as_str().eq_ignore_ascii_case("UPSTASH_REDIS_REST_URL") {
                    "store_url".into()
                } else {
                    "store_token".into()
                }
            }))
            .merge(
                Env::prefixed("SCRAPECACHE_")
                    .ignore(&["CONFIG_FILE"])
                    .map(|key| key.as_str().to_lowercase().into()),
            );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Endpoint and token for the remote store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if either value is not set.
    pub fn require_store_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let url = self.store_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "store_url".into(),
            hint: "Set UPSTASH_REDIS_REST_URL or SCRAPECACHE_STORE_URL".into(),
        })?;
        let token = self.store_token.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "store_token".into(),
            hint: "Set UPSTASH_REDIS_REST_TOKEN or SCRAPECACHE_STORE_TOKEN".into(),
        })?;
        Ok((url, token))
    }
}
