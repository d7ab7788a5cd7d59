//! In-memory search over a single book.
//!
//! - [`SearchIndex`] flattens a book into one [`SearchDocument`] per section.
//! - [`search`] ranks those documents against a query with fixed per-field
//!   weights.
//! - [`normalize`] is the one text normalization used on both sides.

pub mod index;
pub mod normalize;
pub mod query;

pub use index::{SearchDocument, SearchIndex};
pub use normalize::normalize;
pub use query::{ScoredResult, query_terms, score_document, search};
