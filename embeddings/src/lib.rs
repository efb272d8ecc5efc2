//! # Embeddings
//!
//! This crate turns text into dense vectors through an external provider and
//! compares those vectors for the job matcher.
//!
//! ## Features
//!
//! - **Batched Embedding**: Split large inputs into provider-sized requests
//! - **Provider Abstraction**: OpenAI-compatible HTTP provider behind a trait
//! - **Similarity Ranking**: Stable cosine-similarity top-k
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingClient ──► EmbeddingProvider ──► EmbeddingBatch      │
//! │       │                    │                     │              │
//! │       ▼                    ▼                     ▼              │
//! │  batch splitting     OpenAIProvider         rank_top_k         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod provider;
pub mod similarity;

pub use client::{DEFAULT_BATCH_SIZE, EmbeddedText, EmbeddingBatch, EmbeddingClient};
pub use error::{EmbeddingError, Result};
pub use provider::{
    EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider, Usage,
};
pub use similarity::{RankedCandidate, cosine, cosine_similarity, rank_top_k};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
