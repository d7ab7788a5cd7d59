//! book_search tool implementation.
//!
//! Ranks the sections of a book against a free-text query.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{book_key, json_result};
use folio_client::{Fetcher, Library};
use folio_core::search::query_terms;
use folio_core::{AppConfig, Error};

/// Upper bound for `limit`.
const MAX_LIMIT: usize = 200;

/// Input parameters for book_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BookSearchParams {
    /// Book document URL. Defaults to the configured book.
    #[serde(default)]
    pub url: Option<String>,

    /// Search query. Terms are matched case- and accent-insensitively.
    pub query: String,

    /// Maximum number of results (1-200, default from configuration).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Output structure for book_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookSearchOutput {
    pub query: String,
    /// Normalized terms the query was split into.
    pub terms: Vec<String>,
    /// Number of matching sections before `limit` was applied.
    pub total: usize,
    pub results: Vec<SearchHit>,
}

/// One matching section.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchHit {
    /// Result rank (1-indexed).
    pub rank: usize,
    pub score: u32,
    pub section_id: String,
    /// `book$<bookId>$<sectionId>` fragment, when the book has an id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub chapter_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_number: Option<String>,
    pub section_title: String,
    pub summary: String,
}

/// Implementation of the book_search tool.
pub async fn search_impl<F: Fetcher>(
    library: &Library<F>, config: &AppConfig, params: BookSearchParams,
) -> Result<CallToolResult, McpError> {
    let limit = params.limit.unwrap_or(config.max_results);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(Error::InvalidInput(format!("limit must be between 1 and {MAX_LIMIT}")).into());
    }

    let key = book_key(config, params.url.as_deref())?;
    let book = library.open(key).await?;

    let terms = query_terms(&params.query);
    let matches = book.index.search(&params.query);
    let total = matches.len();

    tracing::debug!(key, query = %params.query, total, "book search");

    let results = matches
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, m)| SearchHit {
            rank: i + 1,
            score: m.score,
            section_id: m.document.id.clone(),
            location: book.document.location_of(&m.document.id).map(|l| l.to_fragment()),
            chapter_title: m.document.chapter_title.clone(),
            section_number: m.document.section_number.as_ref().map(ToString::to_string),
            section_title: m.document.section_title.clone(),
            summary: m.document.summary.clone(),
        })
        .collect();

    json_result(&BookSearchOutput { query: params.query, terms, total, results })
}
