//! Diagnostic summary attached to every match.

use jobmatch_embeddings::{EmbeddedText, Usage};
use serde::Serialize;

use crate::config::QueryConfig;
use crate::index::VectorIndex;
use crate::ranker::MatchResult;

/// One line of the top-score summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopScore {
    pub job_title: String,
    pub company: String,
    pub similarity: f32,

    /// `similarity` as a percentage rounded to two decimals.
    pub similarity_percent: f32,
}

/// What happened during a match, for humans. Nothing reads it back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugTrace {
    /// Leading characters of the extracted text, with `...` if cut.
    pub text_preview: String,
    /// Characters of the extracted text once surrounding whitespace is
    /// trimmed; the same count the minimum-length check uses.
    pub text_length: usize,
    pub total_jobs_searched: usize,
    pub embedding_dimensions: usize,
    /// Model that embedded the query.
    pub model: String,
    /// Token usage of the query embedding.
    pub usage: Usage,
    pub embedding_preview: Vec<f32>,
    pub top_scores: Vec<TopScore>,
}

impl DebugTrace {
    pub fn assemble(
        text: &str,
        query: &EmbeddedText,
        index: &VectorIndex,
        result: &MatchResult,
        limits: &QueryConfig,
    ) -> Self {
        let top_scores = result
            .matches
            .iter()
            .take(limits.top_scores_len)
            .map(|m| TopScore {
                job_title: m.job.title().to_string(),
                company: m.job.company().to_string(),
                similarity: m.score,
                similarity_percent: (m.score * 10_000.0).round() / 100.0,
            })
            .collect();

        Self {
            text_preview: preview(text, limits.text_preview_chars),
            text_length: text.trim().chars().count(),
            total_jobs_searched: index.len(),
            embedding_dimensions: query.embedding.len(),
            model: query.model.clone(),
            usage: query.usage,
            embedding_preview: query
                .embedding
                .iter()
                .take(limits.vector_preview_len)
                .copied()
                .collect(),
            top_scores,
        }
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
