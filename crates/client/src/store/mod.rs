//! Remote cache store over the Upstash Redis REST API.
//!
//! ### Protocol
//!
//! - **Endpoint**: the database REST URL (`UPSTASH_REDIS_REST_URL`).
//! - **Authentication**: `Authorization: Bearer <token>`.
//! - **Commands**: each command is a JSON array POSTed to the endpoint root,
//!   e.g. `["SET", key, value, "EX", 604800]`.
//! - **Replies**: `{"result": ...}` on success, `{"error": "..."}` on failure.

pub mod response;

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

use response::RestReply;
use scrapecache_core::{AppConfig, Error, KvStore};

/// Default request timeout for store commands.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// REST store configuration.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Database REST URL.
    pub base_url: String,
    /// Bearer token.
    pub token: String,
    /// Request timeout (default: 5s).
    pub timeout: Duration,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), token: token.into(), timeout: DEFAULT_TIMEOUT }
    }

    /// Build from loaded application config.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the store URL or token is missing.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, Error> {
        let (url, token) = config.require_store_credentials()?;
        Ok(Self::new(url, token))
    }
}

/// Key-value store client for a Redis REST endpoint.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: reqwest::Client,
    config: RestConfig,
}

impl RestStore {
    /// Create a new store client with the given configuration.
    pub fn new(config: RestConfig) -> Result<Self, Error> {
        if config.token.is_empty() {
            return Err(Error::StoreAuth("missing access token".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Store(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Run one command and return its `result`.
    async fn command(&self, args: Value) -> Result<Value, Error> {
        let response = self
            .http
            .post(&self.config.base_url)
            .bearer_auth(&self.config.token)
            .json(&args)
            .send()
            .await
            .map_err(|e| Error::Store(format!("network error: {e}")))?;

        let status = response.status();
        tracing::debug!(command = %args[0], %status, "store response");

        if status == 401 || status == 403 {
            return Err(Error::StoreAuth(format!("status {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Store(format!("failed to read response: {e}")))?;
        let reply: Option<RestReply> = serde_json::from_slice(&bytes).ok();

        match reply {
            Some(RestReply { error: Some(message), .. }) => Err(Error::Store(message)),
            _ if !status.is_success() => Err(Error::Store(format!("status {}", status.as_u16()))),
            Some(reply) => Ok(reply.result),
            None => Err(Error::Store("unreadable reply".into())),
        }
    }
}

#[async_trait]
impl KvStore for RestStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match self.command(json!(["GET", key])).await? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Ok(Some(other.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), Error> {
        let ttl_secs = ttl.as_secs().max(1);
        match self.command(json!(["SET", key, value, "EX", ttl_secs])).await? {
            Value::String(s) if s == "OK" => Ok(()),
            other => Err(Error::Store(format!("unexpected SET reply: {other}"))),
        }
    }

    async fn del(&self, key: &str) -> Result<(), Error> {
        self.command(json!(["DEL", key])).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn store_for(server: &MockServer) -> RestStore {
        RestStore::new(RestConfig::new(server.uri(), "test-token")).unwrap()
    }

    #[test]
    fn test_new_missing_token() {
        let result = RestStore::new(RestConfig::new("https://kv.example.com", ""));
        assert!(matches!(result, Err(Error::StoreAuth(_))));
    }

    #[test]
    fn test_config_from_app_config() {
        let missing = RestConfig::from_app_config(&AppConfig::default());
        assert!(matches!(missing, Err(Error::Config(_))));

        let app = AppConfig {
            store_url: Some("https://kv.example.com".into()),
            store_token: Some("tok".into()),
            ..Default::default()
        };
        let config = RestConfig::from_app_config(&app).unwrap();
        assert_eq!(config.base_url, "https://kv.example.com");
        assert_eq!(config.token, "tok");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_get_hit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(json!(["GET", "scrape: https://example.com"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "{\"a\":1}" })))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let value = store.get("scrape: https://example.com").await.unwrap();
        assert_eq!(value.as_deref(), Some("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_get_miss() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_sends_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!(["SET", "k", "v", "EX", 604800])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "OK" })))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        store.set("k", "v", Duration::from_secs(604_800)).await.unwrap();
    }

    #[tokio::test]
    async fn test_del() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!(["DEL", "k"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        store.del("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, Error::StoreAuth(_)));
    }

    #[tokio::test]
    async fn test_command_error_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "ERR syntax error" })))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let err = store.set("k", "v", Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, Error::Store(ref msg) if msg == "ERR syntax error"));
    }

    #[tokio::test]
    async fn test_server_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        let err = store.del("k").await.unwrap_err();
        assert!(matches!(err, Error::Store(ref msg) if msg.contains("503")));
    }
}
