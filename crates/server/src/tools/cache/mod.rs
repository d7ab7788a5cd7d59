//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and clearing the in-memory
//! document cache.

pub mod purge;
pub mod status;

pub use purge::{CachePurgeParams, purge_impl};
pub use status::{CacheStatusParams, status_impl};
