//! HTTP fetch of pages to scrape.
//!
//! - Plain GET with transport-default redirect handling (limit: 10)
//! - Non-2xx responses are failures
//! - Max body bytes: 5MB (configurable)

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, Url, header};
use std::time::{Duration, Instant};

use scrapecache_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "scrapecache/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "scrapecache/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 10,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Source of page bodies.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve the page at `url`.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error>;
}

/// reqwest-backed fetcher.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning raw bytes and metadata.
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = Url::parse(url_str).map_err(|e| Error::InvalidUrl(format!("{url_str}: {e}")))?;

        tracing::info!(url = %url, "fetching page");

        let response = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(map_transport_error)?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes)", url, final_url, fetch_ms, bytes.len());

        Ok(FetchResponse { url, final_url, status, content_type, bytes, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for FetchClient {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, Error> {
        FetchClient::fetch(self, url).await
    }
}

fn map_transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() { Error::FetchTimeout(e.to_string()) } else { Error::HttpError(format!("network error: {}", e)) }
}
