//! Cache entries and the waiters queued on them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;

use folio_core::Error;

/// Called with the resolved document.
pub type OnSuccess = Box<dyn FnOnce(Arc<Value>) + Send + 'static>;

/// Called with the fetch failure.
pub type OnError = Box<dyn FnOnce(Error) + Send + 'static>;

/// Lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    Idle,
    Loading,
    Resolved,
}

impl EntryState {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryState::Idle => "idle",
            EntryState::Loading => "loading",
            EntryState::Resolved => "resolved",
        }
    }
}

/// A consumer of an entry's next resolution.
pub(crate) enum Waiter {
    Callbacks { on_success: Option<OnSuccess>, on_error: Option<OnError> },
    Channel(oneshot::Sender<Result<Arc<Value>, Error>>),
}

impl Waiter {
    pub(crate) fn complete(self, outcome: Result<&Arc<Value>, &Error>) {
        match (self, outcome) {
            (Waiter::Callbacks { on_success, .. }, Ok(data)) => {
                if let Some(on_success) = on_success {
                    on_success(Arc::clone(data));
                }
            }
            (Waiter::Callbacks { on_error, .. }, Err(err)) => {
                if let Some(on_error) = on_error {
                    on_error(err.clone());
                }
            }
            (Waiter::Channel(tx), outcome) => {
                // The receiving future may have been dropped; nothing to do then.
                let _ = tx.send(outcome.map(Arc::clone).map_err(Error::clone));
            }
        }
    }
}

/// One entry per resource key.
pub(crate) struct CacheEntry {
    pub(crate) state: EntryState,
    pub(crate) data: Option<Arc<Value>>,
    pub(crate) waiters: Vec<Waiter>,
    pub(crate) generation: u64,
    pub(crate) resolved_at: Option<DateTime<Utc>>,
    pub(crate) fetches: u64,
}

impl CacheEntry {
    pub(crate) fn new(generation: u64) -> Self {
        Self { state: EntryState::Idle, data: None, waiters: Vec::new(), generation, resolved_at: None, fetches: 0 }
    }

    pub(crate) fn status(&self, key: &str) -> EntryStatus {
        EntryStatus {
            key: key.to_string(),
            state: self.state,
            waiters: self.waiters.len(),
            fetches: self.fetches,
            resolved_at: self.resolved_at,
        }
    }
}

/// Point-in-time view of an entry, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryStatus {
    pub key: String,
    pub state: EntryState,
    /// Waiters queued for the in-flight fetch.
    pub waiters: usize,
    /// Fetches issued for this entry since it was created.
    pub fetches: u64,
    pub resolved_at: Option<DateTime<Utc>>,
}
