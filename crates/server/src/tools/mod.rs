//! MCP tool implementations.
//!
//! This module contains all tools exposed by the folio server. Every tool
//! takes an optional `url`; when absent the configured `book_url` is used.

pub mod book_search;
pub mod book_section;
pub mod book_toc;
pub mod cache;

pub use book_search::{BookSearchParams, search_impl};
pub use book_section::{BookSectionParams, section_impl};
pub use book_toc::{BookTocParams, toc_impl};
pub use cache::{CachePurgeParams, CacheStatusParams, purge_impl, status_impl};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use folio_core::{AppConfig, Error};

/// Book key for a tool call: the explicit `url` or the configured default.
fn book_key<'a>(config: &'a AppConfig, url: Option<&'a str>) -> Result<&'a str, Error> {
    config.require_book_url(url).map_err(|e| Error::InvalidInput(e.to_string()))
}

fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json =
        serde_json::to_string_pretty(output).map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
