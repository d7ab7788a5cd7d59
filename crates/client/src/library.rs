//! Books loaded through the cache, parsed and indexed once per payload.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::cache::ResourceCache;
use crate::fetch::Fetcher;
use folio_core::{BookDocument, Error, SearchIndex};

/// A parsed book and its search index.
#[derive(Debug)]
pub struct LoadedBook {
    source: Arc<Value>,
    pub document: BookDocument,
    pub index: SearchIndex,
}

impl LoadedBook {
    /// Parse `source` and build its index.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDocument` when the payload is not a book.
    pub fn build(source: Arc<Value>) -> Result<Self, Error> {
        let document = BookDocument::from_value(&source)?;
        let index = SearchIndex::from_book(&document);
        Ok(Self { source, document, index })
    }

    /// The cached payload this book was built from.
    pub fn source(&self) -> &Arc<Value> {
        &self.source
    }
}

/// Opens books by resource key.
///
/// Built books are keyed on the cached payload: as long as the cache hands
/// back the same `Arc`, the same `LoadedBook` is returned.
pub struct Library<F: Fetcher> {
    cache: ResourceCache<F>,
    books: Arc<Mutex<HashMap<String, Arc<LoadedBook>>>>,
}

impl<F: Fetcher> Clone for Library<F> {
    fn clone(&self) -> Self {
        Self { cache: self.cache.clone(), books: Arc::clone(&self.books) }
    }
}

impl<F: Fetcher> Library<F> {
    pub fn new(cache: ResourceCache<F>) -> Self {
        Self { cache, books: Arc::new(Mutex::new(HashMap::new())) }
    }

    pub fn cache(&self) -> &ResourceCache<F> {
        &self.cache
    }

    /// Load, parse and index the book at `key`.
    ///
    /// # Errors
    ///
    /// Fetch failures are passed through from the cache. A payload that loads
    /// but is not a book yields `Error::InvalidDocument`; the cache keeps the
    /// payload, so the next call fails the same way without refetching.
    pub async fn open(&self, key: &str) -> Result<Arc<LoadedBook>, Error> {
        let source = self.cache.load(key).await?;

        if let Some(book) = self.books().get(key).filter(|book| Arc::ptr_eq(&book.source, &source)) {
            return Ok(Arc::clone(book));
        }

        let book = match LoadedBook::build(source) {
            Ok(book) => Arc::new(book),
            Err(e) => {
                tracing::warn!(key, "not a book document: {}", e);
                return Err(e);
            }
        };

        tracing::info!(key, sections = book.index.len(), "book indexed");
        self.books().insert(key.to_string(), Arc::clone(&book));
        Ok(book)
    }

    /// Drop the cached payload and built book for `key`.
    pub fn invalidate(&self, key: &str) -> bool {
        let dropped = self.books().remove(key).is_some();
        self.cache.invalidate(key) || dropped
    }

    /// Drop every cached payload and built book. Returns the number of cache
    /// entries removed.
    pub fn invalidate_all(&self) -> usize {
        self.books().clear();
        self.cache.invalidate_all()
    }

    fn books(&self) -> MutexGuard<'_, HashMap<String, Arc<LoadedBook>>> {
        self.books.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use serde_json::json;

    fn book(title: &str) -> Value {
        json!({
            "book": { "book_id": "guide" },
            "chapters": [{
                "chapter_title": "Basics",
                "sections": [{
                    "section_id": "s1",
                    "section_title": title,
                    "content": ["first", "second"]
                }]
            }]
        })
    }

    fn library() -> Library<MemoryFetcher> {
        let fetcher = MemoryFetcher::new();
        fetcher.insert("book.json", book("Install"));
        fetcher.insert("broken.json", json!({ "title": "no chapters" }));
        Library::new(ResourceCache::new(fetcher))
    }

    #[tokio::test]
    async fn test_open_builds_index() {
        let library = library();
        let book = library.open("book.json").await.unwrap();

        assert_eq!(book.document.book_id(), Some("guide"));
        assert_eq!(book.index.len(), 1);
        assert_eq!(book.index.get("s1").unwrap().content, "first second");
    }

    #[tokio::test]
    async fn test_open_reuses_built_book() {
        let library = library();
        let first = library.open("book.json").await.unwrap();
        let second = library.open("book.json").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(library.cache().fetcher().fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_document_is_distinct_from_fetch_failure() {
        let library = library();

        let result = library.open("broken.json").await;
        assert!(matches!(result, Err(Error::InvalidDocument(_))));

        let result = library.open("missing.json").await;
        assert!(matches!(result, Err(ref e) if e.is_fetch_failure()));
    }

    #[tokio::test]
    async fn test_invalid_document_is_not_refetched() {
        let library = library();
        let _ = library.open("broken.json").await;
        let _ = library.open("broken.json").await;
        assert_eq!(library.cache().fetcher().fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_rebuilds_from_fresh_payload() {
        let library = library();
        let before = library.open("book.json").await.unwrap();

        library.cache().fetcher().insert("book.json", book("Upgrade"));
        assert!(library.invalidate("book.json"));

        let after = library.open("book.json").await.unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.index.get("s1").unwrap().section_title, "Upgrade");
        assert_eq!(library.cache().fetcher().fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let library = library();
        library.open("book.json").await.unwrap();
        let _ = library.open("broken.json").await;

        assert_eq!(library.invalidate_all(), 2);
        assert!(library.cache().peek("book.json").is_none());
        assert!(!library.invalidate("book.json"));
    }
}
