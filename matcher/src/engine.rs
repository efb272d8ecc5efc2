//! The match orchestrator.

use std::sync::Arc;

use jobmatch_catalog::{CatalogLoader, CatalogSource, HttpCatalogSource};
use jobmatch_embeddings::{EmbeddingClient, EmbeddingProvider, OpenAIProvider};
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CacheStatus, VectorIndexCache};
use crate::config::{MatcherConfig, QueryConfig};
use crate::error::{MatchError, Result};
use crate::extract::{PdfExtractor, TextExtractor, extract_text};
use crate::index::VectorIndex;
use crate::ranker::{MatchResult, rank};
use crate::trace::DebugTrace;

/// Matches and the trace of how they were found.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub result: MatchResult,
    pub debug: DebugTrace,
}

/// Matches documents against the job catalog.
///
/// This is the entry point callers use. It coordinates:
/// - Text extraction from the uploaded document
/// - The cached job vector index
/// - Embedding of the document text
/// - Ranking and debug-trace assembly
pub struct MatchEngine {
    query: QueryConfig,
    extractor: Arc<dyn TextExtractor>,
    embedder: EmbeddingClient,
    cache: Arc<VectorIndexCache>,
}

impl MatchEngine {
    /// Create a new match engine builder.
    pub fn builder() -> MatchEngineBuilder {
        MatchEngineBuilder::new()
    }

    /// Create an engine wired to the PDF extractor, the OpenAI provider and
    /// the HTTP catalog described by `config`.
    pub fn new(config: MatcherConfig) -> Result<Self> {
        MatchEngineBuilder::new().with_config(config).build()
    }

    /// Match `document` against the catalog and return the best `k` jobs.
    ///
    /// Fails with [`MatchError::InsufficientText`] before any provider call if
    /// the extracted text is shorter than the configured minimum.
    pub async fn find_matches(&self, document: Vec<u8>, k: usize) -> Result<MatchOutcome> {
        let text = extract_text(Arc::clone(&self.extractor), document).await?;

        let length = text.trim().chars().count();
        if length < self.query.min_text_chars {
            return Err(MatchError::InsufficientText {
                length,
                minimum: self.query.min_text_chars,
            });
        }
        debug!("Extracted {length} characters of document text");

        let index = self.cache.get_or_build().await?;
        let query = self.embedder.embed_one(&text).await?;
        let result = rank(&query.embedding, &index, k)?;
        let debug = DebugTrace::assemble(&text, &query, &index, &result, &self.query);

        info!(
            "Matched document against {} jobs, returning {}",
            index.len(),
            result.len()
        );

        Ok(MatchOutcome { result, debug })
    }

    /// [`Self::find_matches`] with the configured default `top_k`.
    pub async fn find_top_matches(&self, document: Vec<u8>) -> Result<MatchOutcome> {
        self.find_matches(document, self.query.top_k).await
    }

    /// Build the job index now instead of on the first match.
    pub async fn warm(&self) -> Result<Arc<VectorIndex>> {
        self.cache.get_or_build().await
    }

    /// Force the next match to rebuild the index from scratch.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// The index cache, for handing to another engine.
    pub fn cache(&self) -> &Arc<VectorIndexCache> {
        &self.cache
    }

    pub async fn cache_status(&self) -> CacheStatus {
        self.cache.status().await
    }

    /// Whether the embedding provider has a credential.
    pub fn is_provider_available(&self) -> bool {
        self.embedder.is_available()
    }
}

/// Builder for the match engine.
///
/// Collaborators that are not supplied are created from the configuration.
pub struct MatchEngineBuilder {
    config: MatcherConfig,
    extractor: Option<Arc<dyn TextExtractor>>,
    provider: Option<Arc<dyn EmbeddingProvider>>,
    catalog: Option<Arc<dyn CatalogSource>>,
    cache: Option<Arc<VectorIndexCache>>,
}

impl MatchEngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MatcherConfig::default(),
            extractor: None,
            provider: None,
            catalog: None,
            cache: None,
        }
    }

    pub fn with_config(mut self, config: MatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_catalog_source(mut self, catalog: Arc<dyn CatalogSource>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use an existing index cache, e.g. one shared with another engine.
    ///
    /// The cache builds with its own loader and embedder, so the catalog
    /// source and `catalog` config of this builder are ignored. Queries are
    /// still embedded with this builder's provider.
    pub fn with_cache(mut self, cache: Arc<VectorIndexCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<MatchEngine> {
        let config = self.config;
        config.validate()?;

        let provider = self.provider.unwrap_or_else(|| {
            Arc::new(
                OpenAIProvider::new()
                    .with_base_url(&config.embedding.base_url)
                    .with_model(&config.embedding.model),
            )
        });
        let mut embedder = EmbeddingClient::new(provider)
            .with_batch_size(config.embedding.batch_size)
            .with_model(&config.embedding.model);
        if let Some(dimensions) = config.embedding.dimensions {
            embedder = embedder.with_dimensions(dimensions);
        }

        let cache = match self.cache {
            Some(cache) => cache,
            None => {
                let catalog = self.catalog.unwrap_or_else(|| {
                    Arc::new(HttpCatalogSource::new(&config.catalog.base_url))
                });
                let loader =
                    CatalogLoader::new(catalog).with_page_size(config.catalog.page_size);
                Arc::new(VectorIndexCache::new(loader, embedder.clone()))
            }
        };

        let extractor = self.extractor.unwrap_or_else(|| Arc::new(PdfExtractor));

        info!(
            "Match engine ready (provider {}, model {}, batch size {})",
            embedder.provider_name(),
            embedder.model(),
            embedder.batch_size()
        );

        Ok(MatchEngine {
            cache,
            query: config.query,
            extractor,
            embedder,
        })
    }
}

impl Default for MatchEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
