//! In-memory fetcher.
//!
//! Serves documents registered ahead of time, e.g. a book bundled into the
//! binary or fixtures in tests. Unknown keys fail like a 404.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::Fetcher;
use crate::auth::AuthHeaders;
use folio_core::Error;

#[derive(Debug, Default)]
pub struct MemoryFetcher {
    documents: RwLock<HashMap<String, Value>>,
    fetches: AtomicUsize,
    last_headers: RwLock<Option<AuthHeaders>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the document served for `key`.
    pub fn insert(&self, key: impl Into<String>, document: Value) {
        if let Ok(mut documents) = self.documents.write() {
            documents.insert(key.into(), document);
        }
    }

    /// Stop serving `key`.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.documents.write().ok()?.remove(key)
    }

    /// Number of fetches served so far, successful or not.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Headers passed to the most recent fetch.
    pub fn last_headers(&self) -> Option<AuthHeaders> {
        self.last_headers.read().ok()?.clone()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, key: &str, headers: &AuthHeaders) -> Result<Value, Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_headers.write() {
            *last = Some(headers.clone());
        }

        let documents = self
            .documents
            .read()
            .map_err(|_| Error::HttpError("document store poisoned".into()))?;
        documents
            .get(key)
            .cloned()
            .ok_or_else(|| Error::HttpError(format!("status 404: {key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_serves_registered_document() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert("book.json", json!({ "chapters": [] }));

        let value = fetcher.fetch("book.json", &AuthHeaders::new()).await.unwrap();
        assert_eq!(value, json!({ "chapters": [] }));
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_key_is_http_error() {
        let fetcher = MemoryFetcher::new();
        let result = fetcher.fetch("missing.json", &AuthHeaders::new()).await;
        assert!(matches!(result, Err(Error::HttpError(msg)) if msg.contains("404")));
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_records_headers() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert("book.json", json!({}));
        let mut headers = AuthHeaders::new();
        headers.insert("X-API-KEY".into(), "abc".into());

        let _ = fetcher.fetch("book.json", &headers).await;
        assert_eq!(fetcher.last_headers(), Some(headers));
    }

    #[tokio::test]
    async fn test_remove() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert("book.json", json!({}));
        assert!(fetcher.remove("book.json").is_some());
        assert!(fetcher.fetch("book.json", &AuthHeaders::new()).await.is_err());
    }
}
