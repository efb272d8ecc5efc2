//! Similarity computation for embeddings.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings, if it is defined.
///
/// Returns `Ok(None)` when either vector has zero magnitude or the result is
/// not a finite number.
pub fn cosine(a: &[f32], b: &[f32]) -> Result<Option<f32>> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(None);
    }

    // Rounding can push the quotient just past ±1.
    let similarity = dot_product / (magnitude_a * magnitude_b);
    if !similarity.is_finite() {
        return Ok(None);
    }
    Ok(Some(similarity.clamp(-1.0, 1.0)))
}

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical vectors
/// - 0.0 means orthogonal vectors
/// - -1.0 means opposite vectors
///
/// Degenerate inputs (zero magnitude) score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    Ok(cosine(a, b)?.unwrap_or(0.0))
}

/// A candidate's position in the input slice and its score against a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Index into the candidate slice.
    pub position: usize,

    /// Cosine similarity, or 0.0 if it was undefined.
    pub score: f32,

    /// Whether the similarity was undefined (zero-magnitude vector).
    pub degenerate: bool,
}

impl RankedCandidate {
    fn sort_key(&self) -> (bool, OrderedFloat<f32>) {
        (!self.degenerate, OrderedFloat(self.score))
    }
}

/// Rank `candidates` by cosine similarity to `query` and keep the best `k`.
///
/// The ordering is descending by score. Candidates with an undefined
/// similarity score 0.0 and come after every defined score, including
/// negative ones. Ties keep the order of `candidates`.
pub fn rank_top_k(query: &[f32], candidates: &[Embedding], k: usize) -> Result<Vec<RankedCandidate>> {
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut ranked = Vec::with_capacity(candidates.len());
    for (position, embedding) in candidates.iter().enumerate() {
        let candidate = match cosine(query, embedding)? {
            Some(score) => RankedCandidate {
                position,
                score,
                degenerate: false,
            },
            None => RankedCandidate {
                position,
                score: 0.0,
                degenerate: true,
            },
        };
        ranked.push(candidate);
    }

    // `sort_by_key` is stable, which gives the tie-break on input order.
    ranked.sort_by_key(|candidate| Reverse(candidate.sort_key()));
    ranked.truncate(k);

    Ok(ranked)
}
