//! Per-key document cache with single-flight loading.
//!
//! Rule: one key, one entry, at most one fetch in flight.
//!
//! - A resolved entry answers synchronously and never fetches again until it
//!   is invalidated.
//! - Requests arriving while a fetch is in flight are queued and receive the
//!   same result, in the order they arrived.
//! - A failed fetch notifies every queued waiter, then returns the entry to
//!   `Idle` so the next request retries. There is no retry limit or backoff.
//! - Invalidation drops the entry and its waiters. Callback waiters are never
//!   called; [`ResourceCache::load`] futures resolve to `Error::Invalidated`.
//!   A fetch still running for a dropped entry has its result discarded.

pub mod entry;

pub use entry::{EntryState, EntryStatus, OnError, OnSuccess};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::auth::{Credential, TokenSource, compute_headers};
use crate::fetch::Fetcher;
use entry::{CacheEntry, Waiter};
use folio_core::Error;

struct Shared<F> {
    fetcher: F,
    entries: Mutex<HashMap<String, CacheEntry>>,
    credential: RwLock<Credential>,
    next_generation: AtomicU64,
}

/// Document cache keyed by resource key.
///
/// Cloning is cheap and every clone shares the same entries and credential.
/// Fetches are spawned on the current tokio runtime. A request that misses
/// the cache outside any runtime fails its waiters with `Error::HttpError`.
pub struct ResourceCache<F: Fetcher> {
    shared: Arc<Shared<F>>,
}

impl<F: Fetcher> Clone for ResourceCache<F> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<F: Fetcher> ResourceCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            shared: Arc::new(Shared {
                fetcher,
                entries: Mutex::new(HashMap::new()),
                credential: RwLock::new(Credential::default()),
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    /// The fetcher documents are loaded through.
    pub fn fetcher(&self) -> &F {
        &self.shared.fetcher
    }

    /// Request the document at `key`, reporting through callbacks.
    ///
    /// If the entry is resolved, `on_success` runs before this returns.
    /// Otherwise the callbacks are queued and run once the (single) fetch for
    /// `key` completes.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKey` for an empty or whitespace-only key;
    /// nothing is queued then.
    pub fn request(
        &self, key: &str, on_success: impl FnOnce(Arc<Value>) + Send + 'static,
        on_error: impl FnOnce(Error) + Send + 'static,
    ) -> Result<(), Error> {
        self.attach(key, Waiter::Callbacks { on_success: Some(Box::new(on_success)), on_error: Some(Box::new(on_error)) })
    }

    /// Load the document at `key`, sharing any fetch already in flight.
    ///
    /// The fetch itself runs on a spawned task, so dropping this future does
    /// not cancel it for the other waiters.
    pub async fn load(&self, key: &str) -> Result<Arc<Value>, Error> {
        let (tx, rx) = oneshot::channel();
        self.attach(key, Waiter::Channel(tx))?;
        rx.await.map_err(|_| Error::Invalidated(key.to_string()))?
    }

    /// Resolved document for `key`, if any. Never fetches.
    pub fn peek(&self, key: &str) -> Option<Arc<Value>> {
        self.entries().get(key).and_then(|entry| entry.data.clone())
    }

    /// Current status of the entry for `key`, if one exists.
    pub fn status(&self, key: &str) -> Option<EntryStatus> {
        self.entries().get(key).map(|entry| entry.status(key))
    }

    /// Status of every entry, sorted by key.
    pub fn statuses(&self) -> Vec<EntryStatus> {
        let mut statuses: Vec<EntryStatus> =
            self.entries().iter().map(|(key, entry)| entry.status(key)).collect();
        statuses.sort_by(|a, b| a.key.cmp(&b.key));
        statuses
    }

    /// Remove the entry for `key`, abandoning its waiters.
    ///
    /// Returns whether an entry existed.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries().remove(key);
        if let Some(entry) = &removed {
            tracing::debug!(key, abandoned = entry.waiters.len(), "cache entry invalidated");
        }
        removed.is_some()
    }

    /// Remove every entry. Returns how many were removed.
    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.entries();
        let count = entries.len();
        entries.clear();
        tracing::debug!(count, "cache cleared");
        count
    }

    /// Replace the credential used for auth headers. Fetches already in
    /// flight keep the headers they started with.
    pub fn configure_auth(&self, header_name: Option<String>, token: Option<TokenSource>) {
        self.set_credential(Credential::new(header_name, token));
    }

    pub fn set_credential(&self, credential: Credential) {
        match self.shared.credential.write() {
            Ok(mut current) => *current = credential,
            Err(poisoned) => *poisoned.into_inner() = credential,
        }
    }

    fn credential(&self) -> Credential {
        match self.shared.credential.read() {
            Ok(credential) => credential.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.shared.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a waiter on `key`, starting a fetch if the entry is idle.
    fn attach(&self, key: &str, waiter: Waiter) -> Result<(), Error> {
        if key.trim().is_empty() {
            return Err(Error::InvalidKey);
        }

        let mut entries = self.entries();
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(self.shared.next_generation.fetch_add(1, Ordering::Relaxed)));

        if let Some(data) = entry.data.clone() {
            drop(entries);
            tracing::debug!(key, "cache hit");
            waiter.complete(Ok(&data));
            return Ok(());
        }

        entry.waiters.push(waiter);

        if entry.state == EntryState::Loading {
            tracing::debug!(key, waiters = entry.waiters.len(), "joined in-flight fetch");
            return Ok(());
        }

        entry.state = EntryState::Loading;
        entry.fetches += 1;
        let generation = entry.generation;
        drop(entries);

        self.spawn_fetch(key.to_string(), generation);
        Ok(())
    }

    fn spawn_fetch(&self, key: String, generation: u64) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            let err = Error::HttpError("no tokio runtime to run the fetch on".into());
            self.complete(&key, generation, Err(err));
            return;
        };

        // Headers are computed here, at fetch start, outside any lock so a
        // dynamic token source may call back into the cache.
        let headers = compute_headers(&self.credential());
        let cache = self.clone();
        runtime.spawn(async move {
            let outcome = cache.shared.fetcher.fetch(&key, &headers).await;
            cache.complete(&key, generation, outcome);
        });
    }

    fn complete(&self, key: &str, generation: u64, outcome: Result<Value, Error>) {
        let (waiters, outcome) = {
            let mut entries = self.entries();
            let Some(entry) = entries.get_mut(key).filter(|entry| entry.generation == generation) else {
                tracing::warn!(key, "discarding fetch result for invalidated entry");
                return;
            };

            let outcome = match outcome {
                Ok(value) => {
                    let data = Arc::new(value);
                    entry.data = Some(Arc::clone(&data));
                    entry.state = EntryState::Resolved;
                    entry.resolved_at = Some(Utc::now());
                    Ok(data)
                }
                Err(err) => {
                    entry.state = EntryState::Idle;
                    Err(err)
                }
            };

            (std::mem::take(&mut entry.waiters), outcome)
        };

        match &outcome {
            Ok(_) => tracing::info!(key, waiters = waiters.len(), "document loaded"),
            Err(err) => tracing::warn!(key, waiters = waiters.len(), "failed to load document: {}", err),
        }

        for waiter in waiters {
            waiter.complete(outcome.as_ref());
        }
    }
}
