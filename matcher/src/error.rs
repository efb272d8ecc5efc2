//! Error types for the matching engine.

use thiserror::Error;

/// Result type alias for matching operations.
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors that can occur while turning a document into job matches.
#[derive(Error, Debug)]
pub enum MatchError {
    /// The document could not be turned into text.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The document yielded too little text to be matched meaningfully.
    #[error(
        "could not extract enough text from the document: {length} characters, need at least {minimum}"
    )]
    InsufficientText { length: usize, minimum: usize },

    /// The job catalog could not be fetched.
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] jobmatch_catalog::CatalogError),

    /// The embedding provider failed or misbehaved.
    #[error("embedding provider error: {0}")]
    Embedding(#[from] jobmatch_embeddings::EmbeddingError),

    /// The query vector and the index vectors have different lengths.
    #[error("dimension mismatch: index has {expected} dimensions, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors produced by a [`crate::TextExtractor`].
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No bytes were supplied.
    #[error("document is empty")]
    EmptyDocument,

    /// The parser rejected the document.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The parser did not run to completion.
    #[error("extraction aborted: {0}")]
    Aborted(String),
}
