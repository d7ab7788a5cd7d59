//! Fetching book documents.
//!
//! The cache talks to a [`Fetcher`]: given a resource key and the auth
//! headers computed for this request, produce a parsed JSON value.
//!
//! ### HTTP fetcher
//! - Keys are resolved to http(s) URLs; relative keys need a base URL.
//! - `GET` with `Accept: application/json` and `Cache-Control: no-cache`.
//! - Non-2xx statuses and bodies over `max_bytes` are failures.
//! - Max redirects: 5

pub mod memory;
pub mod url;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::Value;
use std::time::{Duration, Instant};

pub use self::memory::MemoryFetcher;
pub use self::url::{UrlError, resolve};

use crate::auth::AuthHeaders;
use folio_core::{AppConfig, Error};

/// Source of book documents.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Fetch and parse the resource behind `key`, sending `headers` along.
    async fn fetch(&self, key: &str, headers: &AuthHeaders) -> Result<Value, Error>;
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "folio/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Base for relative keys
    pub base_url: Option<::url::Url>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "folio/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
            base_url: None,
        }
    }
}

impl FetchConfig {
    /// Derive the fetch settings from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, Error> {
        let base_url = config
            .base_url
            .as_deref()
            .map(::url::Url::parse)
            .transpose()
            .map_err(|e| Error::InvalidUrl(format!("base_url: {e}")))?;

        Ok(Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            base_url,
            ..Default::default()
        })
    }
}

/// Fetches book documents over HTTP.
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
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

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, key: &str, headers: &AuthHeaders) -> Result<Value, Error> {
        let start = Instant::now();
        let url = resolve(key, self.config.base_url.as_ref()).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let mut request = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, "no-cache");
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(format!("{} after {:?}", url, self.config.timeout))
            } else {
                Error::HttpError(format!("network error: {}", e))
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| Error::ParseFailed(e.to_string()))?;

        tracing::debug!("fetched {} in {}ms ({} bytes)", url, start.elapsed().as_millis(), bytes.len());

        Ok(value)
    }
}
