//! Weighted term matching over a [`SearchIndex`].
//!
//! Each query term is checked once against each field of every document; a
//! field that contains the term as a substring (after normalization) adds its
//! weight to the document's score.

use serde::Serialize;

use super::index::{SearchDocument, SearchIndex};
use super::normalize::normalize;

pub const SECTION_TITLE_WEIGHT: u32 = 10;
pub const CHAPTER_TITLE_WEIGHT: u32 = 8;
pub const KEYWORD_WEIGHT: u32 = 8;
pub const SUMMARY_WEIGHT: u32 = 2;
pub const CONTENT_WEIGHT: u32 = 1;

/// A document matched by a query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult<'a> {
    pub document: &'a SearchDocument,
    pub score: u32,
    pub terms: Vec<String>,
}

/// Split a query into normalized terms on whitespace runs.
pub fn query_terms(query: &str) -> Vec<String> {
    normalize(query).split_whitespace().map(str::to_string).collect()
}

/// Score of one document for the given normalized terms.
pub fn score_document(document: &SearchDocument, terms: &[String]) -> u32 {
    let fields = &document.fields;
    terms
        .iter()
        .map(|term| {
            let term = term.as_str();
            let mut score = 0;
            if fields.section_title.contains(term) {
                score += SECTION_TITLE_WEIGHT;
            }
            if fields.chapter_title.contains(term) {
                score += CHAPTER_TITLE_WEIGHT;
            }
            if fields.keywords.iter().any(|k| k.contains(term)) {
                score += KEYWORD_WEIGHT;
            }
            if fields.summary.contains(term) {
                score += SUMMARY_WEIGHT;
            }
            if fields.content.contains(term) {
                score += CONTENT_WEIGHT;
            }
            score
        })
        .sum()
}

/// Rank the documents of `index` against `query`.
///
/// Results are ordered by descending score; equal scores keep index order.
/// An empty or whitespace-only query yields no results.
pub fn search<'a>(index: &'a SearchIndex, query: &str) -> Vec<ScoredResult<'a>> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<ScoredResult<'a>> = index
        .documents()
        .iter()
        .filter_map(|document| {
            let score = score_document(document, &terms);
            (score > 0).then(|| ScoredResult { document, score, terms: terms.clone() })
        })
        .collect();

    // `sort_by` is stable, which keeps index order among equal scores.
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

impl SearchIndex {
    /// Shorthand for [`search`].
    pub fn search(&self, query: &str) -> Vec<ScoredResult<'_>> {
        search(self, query)
    }
}
