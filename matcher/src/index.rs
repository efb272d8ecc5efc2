//! The job vector index.

use jobmatch_catalog::JobRecord;
use jobmatch_embeddings::{Embedding, EmbeddingError, Usage};
use serde::Serialize;

use crate::error::{MatchError, Result};

/// Job records paired positionally with their embeddings.
///
/// `vectors[i]` is the embedding of `records[i].compose_text()`. Both halves
/// are fixed at construction; a refresh builds a new index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorIndex {
    records: Vec<JobRecord>,
    vectors: Vec<Embedding>,
    model: String,
    usage: Usage,
}

impl VectorIndex {
    /// Pair `records` with `vectors`.
    ///
    /// Fails if the two differ in length or the vectors differ in
    /// dimensionality.
    pub fn new(
        records: Vec<JobRecord>,
        vectors: Vec<Embedding>,
        model: impl Into<String>,
        usage: Usage,
    ) -> Result<Self> {
        if records.len() != vectors.len() {
            return Err(MatchError::Embedding(EmbeddingError::InvalidResponse(
                format!(
                    "{} embeddings for {} job records",
                    vectors.len(),
                    records.len()
                ),
            )));
        }

        if let Some(first) = vectors.first() {
            let expected = first.len();
            if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
                return Err(MatchError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }

        Ok(Self {
            records,
            vectors,
            model: model.into(),
            usage,
        })
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn vectors(&self) -> &[Embedding] {
        &self.vectors
    }

    /// Dimensionality of the stored vectors, `None` for an empty index.
    pub fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }

    /// Model that produced the vectors.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Token usage of the build.
    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
