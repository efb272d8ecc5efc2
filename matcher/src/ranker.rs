//! Ranking of the job index against a query vector.

use jobmatch_catalog::JobRecord;
use jobmatch_embeddings::{EmbeddingError, rank_top_k};
use serde::Serialize;

use crate::error::{MatchError, Result};
use crate::index::VectorIndex;

/// A job and its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobMatch {
    pub job: JobRecord,

    /// Cosine similarity in `[-1, 1]`; 0.0 when undefined.
    pub score: f32,
}

/// Jobs ordered by descending score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResult {
    pub matches: Vec<JobMatch>,
}

impl MatchResult {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The matched jobs, best first.
    pub fn jobs(&self) -> impl Iterator<Item = &JobRecord> {
        self.matches.iter().map(|m| &m.job)
    }
}

/// Rank every job in `index` against `query` and keep the best `k`.
///
/// Ties keep catalog order. Jobs whose similarity is undefined (a zero
/// vector on either side) score 0.0 and sort after every defined score.
/// `k = 0` yields an empty result.
pub fn rank(query: &[f32], index: &VectorIndex, k: usize) -> Result<MatchResult> {
    if k == 0 {
        return Ok(MatchResult::default());
    }

    if let Some(expected) = index.dimension() {
        if query.len() != expected {
            return Err(MatchError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }
    }

    let ranked = rank_top_k(query, index.vectors(), k).map_err(|err| match err {
        EmbeddingError::DimensionMismatch { expected, actual } => MatchError::DimensionMismatch {
            expected: actual,
            actual: expected,
        },
        other => MatchError::Embedding(other),
    })?;

    let records = index.records();
    let matches = ranked
        .into_iter()
        .map(|candidate| JobMatch {
            job: records[candidate.position].clone(),
            score: candidate.score,
        })
        .collect();

    Ok(MatchResult { matches })
}
