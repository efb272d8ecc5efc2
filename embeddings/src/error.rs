//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while talking to an embedding provider or comparing
/// the vectors it returns.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// No credential was supplied for the provider.
    #[error("embedding provider not configured: missing API key")]
    ProviderNotConfigured,

    /// The provider answered with a non-success status.
    #[error("API request failed ({status}): {body}")]
    ApiRequest { status: u16, body: String },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The provider answered, but the payload does not line up with the request.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Two vectors that must be comparable have different lengths.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
