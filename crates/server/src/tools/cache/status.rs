//! cache_status tool implementation.
//!
//! Reports the state of cached book documents.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;
use folio_client::{EntryStatus, Fetcher, Library};

/// Parameters for the cache_status tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatusParams {
    /// Only report this key. Reports every entry when absent.
    #[serde(default)]
    pub url: Option<String>,
}

/// Output from the cache_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatusOutput {
    pub entries: Vec<CacheEntryInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheEntryInfo {
    pub key: String,
    /// One of "idle", "loading", "resolved".
    pub state: String,
    /// Requests waiting on the in-flight fetch.
    pub waiters: usize,
    /// Fetches issued since the entry was created.
    pub fetches: u64,
    /// RFC 3339 time of the last successful load.
    pub resolved_at: Option<String>,
}

impl From<EntryStatus> for CacheEntryInfo {
    fn from(status: EntryStatus) -> Self {
        Self {
            key: status.key,
            state: status.state.as_str().to_string(),
            waiters: status.waiters,
            fetches: status.fetches,
            resolved_at: status.resolved_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Implementation of the cache_status tool.
pub async fn status_impl<F: Fetcher>(
    library: &Library<F>, params: CacheStatusParams,
) -> Result<CallToolResult, McpError> {
    let statuses = match params.url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
        Some(key) => library.cache().status(key).into_iter().collect(),
        None => library.cache().statuses(),
    };

    let output = CacheStatusOutput { entries: statuses.into_iter().map(CacheEntryInfo::from).collect() };
    json_result(&output)
}
