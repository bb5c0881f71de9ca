//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Upper bound on `cache_ttl_secs` (1 year).
const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: &str) -> Self {
        ConfigError::Invalid { field: field.into(), reason: reason.into() }
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `cache_ttl_secs`, `max_entry_bytes` or `max_content_chars` is 0
    /// - `cache_ttl_secs` exceeds 1 year
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(ConfigError::invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::invalid("user_agent", "must not be empty"));
        }

        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::invalid("cache_ttl_secs", "must be greater than 0"));
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::invalid("cache_ttl_secs", "must not exceed 1 year (31536000s)"));
        }
        if self.max_entry_bytes == 0 {
            return Err(ConfigError::invalid("max_entry_bytes", "must be greater than 0"));
        }
        if self.max_content_chars == 0 {
            return Err(ConfigError::invalid("max_content_chars", "must be greater than 0"));
        }

        if self.store_url.is_some() != self.store_token.is_some() {
            tracing::warn!(
                store_url_set = self.store_url.is_some(),
                store_token_set = self.store_token.is_some(),
                "Only one of store_url and store_token is set; the remote cache will be unavailable"
            );
        }

        Ok(())
    }
}
