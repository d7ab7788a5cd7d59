//! Book document model.
//!
//! A book is a single JSON document with optional `book` metadata and a list
//! of chapters, each holding a list of sections:
//!
//! ```json
//! {
//!   "book": { "book_id": "leo-cdp", "title": "LEO CDP" },
//!   "chapters": [{
//!     "chapter_id": "ch01",
//!     "chapter_number": 1,
//!     "chapter_title": "Getting Started",
//!     "sections": [{
//!       "section_id": "ch01-sec01",
//!       "section_number": "1.1",
//!       "section_title": "Install",
//!       "keywords": ["setup"],
//!       "summary": "First paragraph",
//!       "content": ["First paragraph", "Second paragraph"]
//!     }]
//!   }]
//! }
//! ```
//!
//! Only `chapters`, `sections`, `section_id` and `section_title` are required.

pub mod location;

pub use location::{LocationError, SectionLocation};

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Error;

/// A parsed book document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub book: BookMeta,
    pub chapters: Vec<Chapter>,
}

/// Book-level metadata. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BookMeta {
    #[serde(default)]
    pub book_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_cover_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Chapter {
    #[serde(default)]
    pub chapter_id: Option<String>,
    #[serde(default)]
    pub chapter_number: Option<Ordinal>,
    #[serde(default, deserialize_with = "nullable")]
    pub chapter_title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    pub section_id: String,
    #[serde(default)]
    pub section_number: Option<Ordinal>,
    pub section_title: String,
    #[serde(default)]
    pub summary_video: Option<SummaryVideo>,
    #[serde(default, deserialize_with = "nullable")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: String,
    /// Content blocks (paragraphs), in reading order.
    #[serde(default, deserialize_with = "nullable")]
    pub content: Vec<String>,
}

/// Video attached to a section's summary. Other frontmatter keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryVideo {
    #[serde(default)]
    pub youtube_id: Option<String>,
}

/// Chapter or section number: exporters emit plain integers for chapters and
/// dotted strings (`"2.3"`) for sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Ordinal {
    Number(u64),
    Text(String),
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ordinal::Number(n) => write!(f, "{n}"),
            Ordinal::Text(s) => f.write_str(s),
        }
    }
}

/// Position of a section inside a book, as (chapter, section) indexes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SectionPosition {
    pub chapter_index: usize,
    pub section_index: usize,
}

/// Treats an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BookDocument {
    /// Interpret a fetched JSON payload as a book.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDocument` when the payload lacks the
    /// chapter/section structure.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        BookDocument::deserialize(value).map_err(|e| Error::InvalidDocument(e.to_string()))
    }

    pub fn book_id(&self) -> Option<&str> {
        self.book.book_id.as_deref()
    }

    /// Iterate over every section with its position, in reading order.
    pub fn sections(&self) -> impl Iterator<Item = (SectionPosition, &Chapter, &Section)> {
        self.chapters.iter().enumerate().flat_map(|(chapter_index, chapter)| {
            chapter.sections.iter().enumerate().map(move |(section_index, section)| {
                (SectionPosition { chapter_index, section_index }, chapter, section)
            })
        })
    }

    /// Find the position of the section with the given id.
    pub fn find_section(&self, section_id: &str) -> Option<SectionPosition> {
        self.sections()
            .find(|(_, _, section)| section.section_id == section_id)
            .map(|(position, _, _)| position)
    }

    /// Chapter and section at a position, if it exists.
    pub fn section_at(&self, position: SectionPosition) -> Option<(&Chapter, &Section)> {
        let chapter = self.chapters.get(position.chapter_index)?;
        let section = chapter.sections.get(position.section_index)?;
        Some((chapter, section))
    }

    /// Location of a section that can be turned into a navigation fragment.
    ///
    /// Returns `None` when the book carries no `book_id`.
    pub fn location_of(&self, section_id: &str) -> Option<SectionLocation> {
        self.book_id().map(|book_id| SectionLocation::new(book_id, section_id))
    }

    /// Resolve a `book$<bookId>$<sectionId>` fragment to a position.
    ///
    /// Falls back to the first section whenever the fragment is malformed,
    /// belongs to another book, or names an unknown section.
    pub fn resolve_location(&self, fragment: &str) -> SectionPosition {
        let location = match SectionLocation::parse(fragment) {
            Ok(location) => location,
            Err(e) => {
                if !fragment.trim_start_matches('#').is_empty() {
                    tracing::warn!(fragment, "invalid location fragment: {}", e);
                }
                return SectionPosition::default();
            }
        };

        if self.book_id() != Some(location.book_id.as_str()) {
            tracing::warn!(expected = ?self.book_id(), actual = %location.book_id, "book id mismatch");
            return SectionPosition::default();
        }

        self.find_section(&location.section_id).unwrap_or_else(|| {
            tracing::warn!(section_id = %location.section_id, "section not found");
            SectionPosition::default()
        })
    }
}
