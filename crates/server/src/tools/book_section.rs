//! book_section tool implementation.
//!
//! Returns the full content of one section, addressed by section id or by a
//! `book$<bookId>$<sectionId>` location fragment.
//!
//! Fragments follow the reader's routing rules: a fragment that is
//! malformed, names another book, or names an unknown section lands on the
//! first section, and the output says so through `fallback`. A plain id that
//! matches no section is an error.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{book_key, json_result};
use folio_client::{Fetcher, Library};
use folio_core::book::{Ordinal, SummaryVideo};
use folio_core::{AppConfig, BookDocument, Error, SectionLocation, SectionPosition};

/// Parameters for the book_section tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BookSectionParams {
    /// Book document URL. Defaults to the configured book.
    #[serde(default)]
    pub url: Option<String>,

    /// Section id (e.g. "ch01-sec02") or location fragment
    /// (e.g. "#book$leo-cdp$ch01-sec02").
    pub section: String,
}

/// Output from the book_section tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookSectionOutput {
    pub section_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub position: SectionPosition,
    /// True when a fragment could not be resolved and the first section was
    /// returned instead.
    pub fallback: bool,
    pub chapter_title: String,
    pub chapter_number: Option<Ordinal>,
    pub section_number: Option<Ordinal>,
    pub section_title: String,
    pub keywords: Vec<String>,
    pub summary: String,
    pub content: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_video: Option<SummaryVideo>,
    /// Id of the previous section in reading order.
    pub previous: Option<String>,
    /// Id of the next section in reading order.
    pub next: Option<String>,
}

/// Implementation of the book_section tool.
pub async fn section_impl<F: Fetcher>(
    library: &Library<F>, config: &AppConfig, params: BookSectionParams,
) -> Result<CallToolResult, McpError> {
    let requested = params.section.trim();
    if requested.is_empty() {
        return Err(Error::InvalidInput("section cannot be empty".into()).into());
    }

    let key = book_key(config, params.url.as_deref())?;
    let book = library.open(key).await?;
    let document = &book.document;

    let (position, fallback) = locate(document, requested)?;
    let (chapter, section) = document
        .section_at(position)
        .ok_or_else(|| Error::SectionNotFound(format!("{requested} (book has no sections)")))?;

    let ids: Vec<&str> = document.sections().map(|(_, _, s)| s.section_id.as_str()).collect();
    let current = ids.iter().position(|id| *id == section.section_id);
    let previous = current.and_then(|i| i.checked_sub(1)).and_then(|i| ids.get(i));
    let next = current.and_then(|i| ids.get(i + 1));

    let output = BookSectionOutput {
        section_id: section.section_id.clone(),
        location: document.location_of(&section.section_id).map(|l| l.to_fragment()),
        position,
        fallback,
        chapter_title: chapter.chapter_title.clone(),
        chapter_number: chapter.chapter_number.clone(),
        section_number: section.section_number.clone(),
        section_title: section.section_title.clone(),
        keywords: section.keywords.clone(),
        summary: section.summary.clone(),
        content: section.content.clone(),
        summary_video: section.summary_video.clone(),
        previous: previous.map(|id| id.to_string()),
        next: next.map(|id| id.to_string()),
    };

    json_result(&output)
}

/// Position for a section id or a location fragment, and whether the
/// fragment fell back to the first section.
fn locate(document: &BookDocument, requested: &str) -> Result<(SectionPosition, bool), Error> {
    if requested.starts_with('#') || requested.contains('$') {
        let position = document.resolve_location(requested);
        let fallback = SectionLocation::parse(requested)
            .ok()
            .filter(|location| document.book_id() == Some(location.book_id.as_str()))
            .and_then(|location| document.find_section(&location.section_id))
            != Some(position);
        return Ok((position, fallback));
    }

    document
        .find_section(requested)
        .map(|position| (position, false))
        .ok_or_else(|| Error::SectionNotFound(requested.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing;

    fn params(section: &str) -> BookSectionParams {
        BookSectionParams { section: section.into(), ..Default::default() }
    }

    async fn section(section: &str) -> Result<BookSectionOutput, McpError> {
        let library = testing::library();
        let result = section_impl(&library, &testing::config(), params(section)).await?;
        Ok(testing::output(&result))
    }

    #[tokio::test]
    async fn test_section_by_id() {
        let output = section("ch01-sec02").await.unwrap();

        assert_eq!(output.section_title, "First Launch");
        assert_eq!(output.position, SectionPosition { chapter_index: 0, section_index: 1 });
        assert_eq!(output.content, vec!["The search box is at the top."]);
        assert_eq!(output.location.as_deref(), Some("book$guide$ch01-sec02"));
        assert_eq!(output.previous.as_deref(), Some("ch01-sec01"));
        assert_eq!(output.next.as_deref(), Some("ch02-sec01"));
        assert!(!output.fallback);
    }

    #[tokio::test]
    async fn test_section_with_summary_video() {
        let output = section("ch01-sec01").await.unwrap();
        let video = output.summary_video.unwrap();
        assert_eq!(video.youtube_id.as_deref(), Some("dQw4w9WgXcQ"));

        let output = section("ch01-sec02").await.unwrap();
        assert!(output.summary_video.is_none());
    }

    #[tokio::test]
    async fn test_section_by_fragment() {
        let output = section("#book$guide$ch02-sec01").await.unwrap();

        assert_eq!(output.section_id, "ch02-sec01");
        assert_eq!(output.chapter_number, Some(Ordinal::Number(2)));
        assert_eq!(output.next, None);
        assert!(!output.fallback);
    }

    #[tokio::test]
    async fn test_fragment_for_other_book_falls_back() {
        let output = section("book$other$ch02-sec01").await.unwrap();

        assert_eq!(output.section_id, "ch01-sec01");
        assert_eq!(output.previous, None);
        assert!(output.fallback);
    }

    #[tokio::test]
    async fn test_malformed_fragment_falls_back() {
        let output = section("#book$guide").await.unwrap();
        assert_eq!(output.position, SectionPosition::default());
        assert!(output.fallback);
    }

    #[tokio::test]
    async fn test_unknown_section_id() {
        let err = section("ch09-sec09").await.unwrap_err();
        assert_eq!(err.code.0, -32015);
    }

    #[tokio::test]
    async fn test_empty_section() {
        let err = section("  ").await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
