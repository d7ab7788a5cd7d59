//! Core types and shared functionality for folio.
//!
//! This crate provides:
//! - The book document model and section locations
//! - The per-section search index and query engine
//! - Unified error types
//! - Configuration structures

pub mod book;
pub mod config;
pub mod error;
pub mod search;

pub use book::{BookDocument, SectionLocation, SectionPosition};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use search::{ScoredResult, SearchDocument, SearchIndex};
