//! cache_purge tool implementation.
//!
//! Drops one cached book, or all of them, so the next request refetches.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::{book_key, json_result};
use folio_client::{Fetcher, Library};
use folio_core::AppConfig;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Key to purge. Defaults to the configured book.
    #[serde(default)]
    pub url: Option<String>,

    /// Purge every entry; `url` is ignored.
    #[serde(default)]
    pub all: bool,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries removed.
    pub purged: usize,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl<F: Fetcher>(
    library: &Library<F>, config: &AppConfig, params: CachePurgeParams,
) -> Result<CallToolResult, McpError> {
    let purged = if params.all {
        library.invalidate_all()
    } else {
        let key = book_key(config, params.url.as_deref())?;
        usize::from(library.invalidate(key))
    };

    tracing::info!(purged, all = params.all, "cache purged");

    json_result(&CachePurgeOutput { purged })
}
