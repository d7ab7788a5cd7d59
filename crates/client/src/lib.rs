//! Client code for folio.
//!
//! This crate provides the document cache, auth header computation, the
//! fetchers behind the cache, and the library that turns cached payloads
//! into indexed books.

pub mod auth;
pub mod cache;
pub mod fetch;
pub mod library;

pub use auth::{AuthHeaders, Credential, TokenSource, compute_headers};
pub use cache::{EntryState, EntryStatus, ResourceCache};
pub use fetch::{FetchConfig, Fetcher, HttpFetcher, MemoryFetcher};
pub use library::{Library, LoadedBook};
