//! book_toc tool implementation.
//!
//! Returns book metadata and the chapter/section outline.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{book_key, json_result};
use folio_client::{Fetcher, Library};
use folio_core::AppConfig;
use folio_core::book::{BookMeta, Ordinal};

/// Parameters for the book_toc tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BookTocParams {
    /// Book document URL. Defaults to the configured book.
    #[serde(default)]
    pub url: Option<String>,
}

/// Output from the book_toc tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookTocOutput {
    pub book: BookMeta,
    pub section_count: usize,
    pub chapters: Vec<TocChapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TocChapter {
    pub chapter_id: Option<String>,
    pub chapter_number: Option<Ordinal>,
    pub chapter_title: String,
    pub sections: Vec<TocSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TocSection {
    pub section_id: String,
    pub section_number: Option<Ordinal>,
    pub section_title: String,
    /// `book$<bookId>$<sectionId>` fragment, when the book has an id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Implementation of the book_toc tool.
pub async fn toc_impl<F: Fetcher>(
    library: &Library<F>, config: &AppConfig, params: BookTocParams,
) -> Result<CallToolResult, McpError> {
    let key = book_key(config, params.url.as_deref())?;
    let book = library.open(key).await?;
    let document = &book.document;

    let chapters = document
        .chapters
        .iter()
        .map(|chapter| TocChapter {
            chapter_id: chapter.chapter_id.clone(),
            chapter_number: chapter.chapter_number.clone(),
            chapter_title: chapter.chapter_title.clone(),
            sections: chapter
                .sections
                .iter()
                .map(|section| TocSection {
                    section_id: section.section_id.clone(),
                    section_number: section.section_number.clone(),
                    section_title: section.section_title.clone(),
                    location: document.location_of(&section.section_id).map(|l| l.to_fragment()),
                })
                .collect(),
        })
        .collect();

    json_result(&BookTocOutput { book: document.book.clone(), section_count: book.index.len(), chapters })
}
