//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FOLIO_*)
//! 2. TOML config file (if FOLIO_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FOLIO_*)
/// 2. TOML config file (if FOLIO_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default book document key used when a tool call names none.
    ///
    /// Set via FOLIO_BOOK_URL environment variable.
    #[serde(default)]
    pub book_url: Option<String>,

    /// Base URL that relative resource keys are resolved against.
    ///
    /// Set via FOLIO_BASE_URL environment variable.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Name of the header carrying the API token (e.g. `X-API-KEY`).
    ///
    /// Set via FOLIO_AUTH_HEADER environment variable.
    #[serde(default)]
    pub auth_header: Option<String>,

    /// Static API token.
    ///
    /// Set via FOLIO_AUTH_TOKEN environment variable.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Name of an environment variable holding the token, re-read on every fetch.
    ///
    /// Set via FOLIO_AUTH_TOKEN_ENV environment variable.
    #[serde(default)]
    pub auth_token_env: Option<String>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via FOLIO_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via FOLIO_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via FOLIO_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Default number of search results returned by `book_search`.
    ///
    /// Set via FOLIO_MAX_RESULTS environment variable.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_user_agent() -> String {
    "folio/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_results() -> usize {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            book_url: None,
            base_url: None,
            auth_header: None,
            auth_token: None,
            auth_token_env: None,
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_results: default_max_results(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FOLIO_`
    /// 2. TOML file from `FOLIO_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or
    /// if validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FOLIO_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FOLIO_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Pick the book key for a request: the explicit one if given, otherwise
    /// the configured default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if neither is available.
    pub fn require_book_url<'a>(&'a self, explicit: Option<&'a str>) -> Result<&'a str, ConfigError> {
        explicit
            .filter(|url| !url.trim().is_empty())
            .or(self.book_url.as_deref())
            .ok_or_else(|| ConfigError::Missing {
                field: "book_url".into(),
                hint: "Pass `url` or set FOLIO_BOOK_URL environment variable".into(),
            })
    }
}
