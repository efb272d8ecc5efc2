//! Error types for catalog access.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that make the job catalog unavailable.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The request for a page could not be completed.
    #[error("catalog request for page {page} failed: {source}")]
    Request {
        page: usize,
        #[source]
        source: reqwest::Error,
    },

    /// The catalog answered a page request with a non-success status.
    #[error("catalog returned {status} for page {page}: {body}")]
    Status {
        page: usize,
        status: u16,
        body: String,
    },

    /// A page body could not be decoded.
    #[error("catalog page {page} is malformed: {source}")]
    Parse {
        page: usize,
        #[source]
        source: serde_json::Error,
    },
}
