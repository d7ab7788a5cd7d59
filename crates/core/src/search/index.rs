//! Flat per-section search index.

use serde::Serialize;
use serde_json::Value;

use super::normalize::normalize;
use crate::Error;
use crate::book::{BookDocument, Ordinal};

/// One searchable entry per book section.
#[derive(Debug, Clone, Serialize)]
pub struct SearchDocument {
    /// Section id; the same id used in `book$<bookId>$<sectionId>` locations.
    pub id: String,
    pub chapter_title: String,
    pub chapter_number: Option<Ordinal>,
    pub section_number: Option<Ordinal>,
    pub section_title: String,
    pub keywords: Vec<String>,
    pub summary: String,
    /// Content blocks joined with single spaces.
    pub content: String,
    /// Normalized chapter title, section title, keywords, summary and content.
    #[serde(skip)]
    pub normalized_blob: String,
    #[serde(skip)]
    pub(crate) fields: NormalizedFields,
}

/// Normalized copies of the scored fields, computed once at build time.
#[derive(Debug, Clone, Default)]
pub(crate) struct NormalizedFields {
    pub(crate) section_title: String,
    pub(crate) chapter_title: String,
    pub(crate) keywords: Vec<String>,
    pub(crate) summary: String,
    pub(crate) content: String,
}

/// Immutable index over a single book.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    documents: Vec<SearchDocument>,
}

impl SearchIndex {
    /// Build an index from a fetched JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDocument` when the payload is not shaped like a
    /// book; a malformed document is never indexed as empty.
    pub fn build(value: &Value) -> Result<Self, Error> {
        let book = BookDocument::from_value(value)?;
        Ok(Self::from_book(&book))
    }

    /// Build an index from an already parsed book, in reading order.
    pub fn from_book(book: &BookDocument) -> Self {
        let documents = book
            .sections()
            .map(|(_, chapter, section)| {
                let content = section.content.join(" ");
                let normalized_blob = normalize(&format!(
                    "{} {} {} {} {}",
                    chapter.chapter_title,
                    section.section_title,
                    section.keywords.join(" "),
                    section.summary,
                    content
                ));
                let fields = NormalizedFields {
                    section_title: normalize(&section.section_title),
                    chapter_title: normalize(&chapter.chapter_title),
                    keywords: section.keywords.iter().map(|k| normalize(k)).collect(),
                    summary: normalize(&section.summary),
                    content: normalize(&content),
                };

                SearchDocument {
                    id: section.section_id.clone(),
                    chapter_title: chapter.chapter_title.clone(),
                    chapter_number: chapter.chapter_number.clone(),
                    section_number: section.section_number.clone(),
                    section_title: section.section_title.clone(),
                    keywords: section.keywords.clone(),
                    summary: section.summary.clone(),
                    content,
                    normalized_blob,
                    fields,
                }
            })
            .collect();

        Self { documents }
    }

    pub fn documents(&self) -> &[SearchDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by section id.
    pub fn get(&self, id: &str) -> Option<&SearchDocument> {
        self.documents.iter().find(|doc| doc.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "book": { "book_id": "algo" },
            "chapters": [
                {
                    "chapter_number": 1,
                    "chapter_title": "Algorithms",
                    "sections": [
                        { "section_id": "ch01-sec01", "section_number": "1.1", "section_title": "Binary Search",
                          "keywords": ["search", "array"], "summary": "Find an element",
                          "content": ["Binary search runs", "in log n time"] },
                        { "section_id": "ch01-sec02", "section_number": "1.2", "section_title": "Tri rapide",
                          "keywords": ["Tri", "Pivot"], "summary": "Élément pivot", "content": [] }
                    ]
                },
                {
                    "chapter_number": 2,
                    "chapter_title": "Graphs",
                    "sections": [
                        { "section_id": "ch02-sec01", "section_title": "BFS" }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_build_one_document_per_section_in_order() {
        let index = SearchIndex::build(&sample()).unwrap();
        let ids: Vec<&str> = index.documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["ch01-sec01", "ch01-sec02", "ch02-sec01"]);
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_build_copies_metadata() {
        let index = SearchIndex::build(&sample()).unwrap();
        let doc = index.get("ch01-sec01").unwrap();
        assert_eq!(doc.chapter_title, "Algorithms");
        assert_eq!(doc.chapter_number, Some(Ordinal::Number(1)));
        assert_eq!(doc.section_number, Some(Ordinal::Text("1.1".into())));
        assert_eq!(doc.keywords, vec!["search", "array"]);
        assert_eq!(doc.content, "Binary search runs in log n time");
    }

    #[test]
    fn test_normalized_blob() {
        let index = SearchIndex::build(&sample()).unwrap();
        let doc = index.get("ch01-sec02").unwrap();
        assert_eq!(doc.normalized_blob, "algorithms tri rapide tri pivot element pivot ");
        assert_eq!(doc.fields.summary, "element pivot");
        assert_eq!(doc.fields.keywords, vec!["tri", "pivot"]);
    }

    #[test]
    fn test_build_missing_chapters_is_invalid() {
        let result = SearchIndex::build(&json!({ "book": { "title": "x" } }));
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_build_section_without_title_is_invalid() {
        let result = SearchIndex::build(&json!({ "chapters": [{ "sections": [{ "section_id": "a" }] }] }));
        assert!(matches!(result, Err(Error::InvalidDocument(msg)) if msg.contains("section_title")));
    }

    #[test]
    fn test_build_empty_book() {
        let index = SearchIndex::build(&json!({ "chapters": [] })).unwrap();
        assert!(index.is_empty());
        assert!(index.get("anything").is_none());
    }
}
