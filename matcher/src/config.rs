//! Configuration for the matching engine.

use std::path::Path;

use jobmatch_catalog::{DEFAULT_CATALOG_URL, DEFAULT_PAGE_SIZE};
use jobmatch_embeddings::DEFAULT_BATCH_SIZE;
use jobmatch_embeddings::provider::{OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL};
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Overrides the catalog base URL.
pub const CATALOG_URL_ENV: &str = "JOBMATCH_CATALOG_URL";

/// Overrides the embedding provider base URL.
pub const EMBEDDING_URL_ENV: &str = "OPENAI_BASE_URL";

/// Configuration for the matching engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,

    /// Job catalog configuration.
    pub catalog: CatalogConfig,

    /// Query processing configuration.
    pub query: QueryConfig,
}

impl MatcherConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TOML configuration file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            MatchError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a TOML configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| MatchError::Config(err.to_string()))
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(CATALOG_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.catalog.base_url = url;
        }
        if let Some(url) = lookup(EMBEDDING_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.embedding.base_url = url;
        }
        self
    }

    /// Set the embedding configuration.
    pub fn with_embedding(mut self, config: EmbeddingConfig) -> Self {
        self.embedding = config;
        self
    }

    /// Set the catalog configuration.
    pub fn with_catalog(mut self, config: CatalogConfig) -> Self {
        self.catalog = config;
        self
    }

    /// Set the query configuration.
    pub fn with_query(mut self, config: QueryConfig) -> Self {
        self.query = config;
        self
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.embedding.batch_size == 0 {
            return Err(MatchError::Config(
                "embedding.batch_size must be at least 1".to_string(),
            ));
        }
        if self.catalog.page_size == 0 {
            return Err(MatchError::Config(
                "catalog.page_size must be at least 1".to_string(),
            ));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(MatchError::Config("embedding.model must be set".to_string()));
        }
        Ok(())
    }
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Model to use for embeddings.
    pub model: String,

    /// Maximum number of texts per provider request.
    pub batch_size: usize,

    /// Requested output dimensionality, if the model supports it.
    pub dimensions: Option<usize>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_BASE_URL.to_string(),
            model: OPENAI_DEFAULT_MODEL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            dimensions: None,
        }
    }
}

/// Configuration for the job catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL; pages are fetched from `{base_url}/jobs`.
    pub base_url: String,

    /// Number of jobs requested per page.
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Configuration for query processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Number of matches returned when the caller does not say.
    pub top_k: usize,

    /// Minimum number of characters the extracted text must have.
    pub min_text_chars: usize,

    /// Characters of extracted text kept in the debug trace.
    pub text_preview_chars: usize,

    /// Leading query-vector components kept in the debug trace.
    pub vector_preview_len: usize,

    /// Number of top scores summarized in the debug trace.
    pub top_scores_len: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_text_chars: 50,
            text_preview_chars: 500,
            vector_preview_len: 20,
            top_scores_len: 5,
        }
    }
}
