//! Unified error types for folio.
//!
//! A single failure is fanned out to every waiter queued on a cache entry, so
//! the type is `Clone` and carries its reasons as strings.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the folio crates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A resource was requested with an empty key.
    #[error("INVALID_KEY: resource key must not be empty")]
    InvalidKey,

    /// Invalid input parameters (e.g., empty section id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The resource key could not be turned into a fetchable URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network failure or non-success HTTP status.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// The response body is not valid JSON.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// The payload parsed but does not have the chapter/section shape of a book.
    #[error("INVALID_DOCUMENT: {0}")]
    InvalidDocument(String),

    /// No section with the requested id exists in the book.
    #[error("SECTION_NOT_FOUND: {0}")]
    SectionNotFound(String),

    /// The cache entry was removed while a caller was still waiting on it.
    #[error("INVALIDATED: {0}")]
    Invalidated(String),
}

impl Error {
    /// Whether this error came from the transport (network, status, size or
    /// body parsing) rather than from the caller or the document contents.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::HttpError(_) | Error::FetchTimeout(_) | Error::FetchTooLarge(_) | Error::ParseFailed(_)
        )
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidKey => (-32602, err.to_string()),
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::FetchTimeout(msg) => (-32006, msg.clone()),
            Error::FetchTooLarge(msg) => (-32007, msg.clone()),
            Error::ParseFailed(msg) => (-32013, msg.clone()),
            Error::InvalidDocument(msg) => (-32014, msg.clone()),
            Error::SectionNotFound(msg) => (-32015, msg.clone()),
            Error::Invalidated(msg) => (-32016, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
