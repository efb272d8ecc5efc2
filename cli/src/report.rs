//! JSON documents printed by the CLI.

use jobmatch_embeddings::Usage;
use jobmatch_matcher::{DebugTrace, JobRecord, MatchOutcome, VectorIndex};
use serde::Serialize;

/// A matched job with its score next to the catalog fields.
#[derive(Debug, Serialize)]
pub struct MatchEntry<'a> {
    #[serde(flatten)]
    pub job: &'a JobRecord,
    pub similarity: f32,
}

/// Result of matching one file.
#[derive(Debug, Serialize)]
pub struct MatchReport<'a> {
    pub message: &'static str,
    pub file: String,
    pub matches: Vec<MatchEntry<'a>>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<&'a DebugTrace>,
}

impl<'a> MatchReport<'a> {
    pub fn new(file: String, outcome: &'a MatchOutcome, include_debug: bool) -> Self {
        let matches: Vec<MatchEntry<'a>> = outcome
            .result
            .matches
            .iter()
            .map(|m| MatchEntry {
                job: &m.job,
                similarity: m.score,
            })
            .collect();

        Self {
            message: "Successfully found job matches",
            file,
            count: matches.len(),
            matches,
            debug: include_debug.then_some(&outcome.debug),
        }
    }
}

/// A file that could not be matched.
#[derive(Debug, Serialize)]
pub struct FailureReport {
    pub file: String,
    pub error: String,
}

/// Summary of a freshly built index.
#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub jobs: usize,
    pub dimensions: usize,
    pub model: String,
    pub usage: Usage,
}

impl From<&VectorIndex> for IndexReport {
    fn from(index: &VectorIndex) -> Self {
        Self {
            jobs: index.len(),
            dimensions: index.dimension().unwrap_or_default(),
            model: index.model().to_string(),
            usage: index.usage(),
        }
    }
}
