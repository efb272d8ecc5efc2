//! Batched embedding client.
//!
//! [`EmbeddingClient`] turns an arbitrarily long list of texts into a list of
//! vectors aligned with the input, issuing as many provider calls as the
//! configured batch size requires.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest, Usage};

/// Default number of inputs per provider request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Vectors for a list of texts, positionally aligned with the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingBatch {
    /// One vector per input text.
    pub embeddings: Vec<Embedding>,

    /// Model identifier reported by the provider.
    pub model: String,

    /// Token usage summed over every provider call.
    pub usage: Usage,
}

impl EmbeddingBatch {
    /// Dimensionality shared by every vector, if there are any.
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}

/// The embedding of a single text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedText {
    pub embedding: Embedding,
    pub model: String,
    pub usage: Usage,
}

/// Splits embedding work into provider-sized requests.
///
/// A failing batch aborts the whole call; nothing is retried.
#[derive(Clone)]
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    model: Option<String>,
    dimensions: Option<usize>,
}

impl EmbeddingClient {
    /// Create a client over `provider` with the default batch size.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            batch_size: DEFAULT_BATCH_SIZE,
            model: None,
            dimensions: None,
        }
    }

    /// Set the maximum number of inputs per provider request (at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Override the provider's default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Request (and enforce) a fixed output dimensionality.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Model requested from the provider.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Whether the underlying provider has what it needs to make calls.
    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Embed `texts`, returning one vector per text in the same order.
    ///
    /// Fails with [`EmbeddingError::InvalidResponse`] if a provider call
    /// returns the wrong number of vectors or the vectors disagree on their
    /// dimensionality.
    pub async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatch> {
        if texts.is_empty() {
            return Ok(EmbeddingBatch {
                embeddings: Vec::new(),
                model: self.model().to_string(),
                usage: Usage::default(),
            });
        }

        let batches = texts.len().div_ceil(self.batch_size);
        let mut embeddings = Vec::with_capacity(texts.len());
        let mut usage = Usage::default();
        let mut model: Option<String> = None;
        let mut dimension = self.dimensions;

        for (batch_number, chunk) in texts.chunks(self.batch_size).enumerate() {
            debug!(
                "Embedding batch {}/{batches} ({} texts) via {}",
                batch_number + 1,
                chunk.len(),
                self.provider.name()
            );

            let mut request = EmbeddingRequest::new(chunk.to_vec()).with_model(self.model());
            if let Some(dims) = self.dimensions {
                request = request.with_dimensions(dims);
            }

            let response = self.provider.embed_batch(request).await?;

            if response.embeddings.len() != chunk.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "provider returned {} embeddings for a batch of {}",
                    response.embeddings.len(),
                    chunk.len()
                )));
            }

            for embedding in &response.embeddings {
                if embedding.is_empty() {
                    return Err(EmbeddingError::InvalidResponse(
                        "provider returned an empty embedding".to_string(),
                    ));
                }
                match dimension {
                    Some(expected) if embedding.len() != expected => {
                        return Err(EmbeddingError::InvalidResponse(format!(
                            "embedding has {} dimensions, expected {expected}",
                            embedding.len()
                        )));
                    }
                    Some(_) => {}
                    None => dimension = Some(embedding.len()),
                }
            }

            usage += response.usage;
            if model.is_none() {
                model = Some(response.model);
            }
            embeddings.extend(response.embeddings);
        }

        info!(
            "Embedded {} texts in {batches} batches ({} tokens)",
            embeddings.len(),
            usage.total_tokens
        );

        Ok(EmbeddingBatch {
            embeddings,
            model: model.unwrap_or_else(|| self.model().to_string()),
            usage,
        })
    }

    /// Embed a single text.
    pub async fn embed_one(&self, text: &str) -> Result<EmbeddedText> {
        let batch = self.embed(&[text.to_string()]).await?;
        let EmbeddingBatch {
            embeddings,
            model,
            usage,
        } = batch;
        let embedding = embeddings.into_iter().next().ok_or_else(|| {
            EmbeddingError::InvalidResponse("no embedding returned for query".to_string())
        })?;

        Ok(EmbeddedText {
            embedding,
            model,
            usage,
        })
    }
}
