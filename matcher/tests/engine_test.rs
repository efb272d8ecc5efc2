//! End-to-end behaviour of the match engine with in-memory collaborators.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{
    CannedExtractor, KeywordProvider, RUST_CV, StaticCatalog, engine, job, keyword_vector,
    sample_jobs,
};
use jobmatch_embeddings::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, Usage};
use jobmatch_matcher::{
    CacheStatus, ExtractionError, JobRecord, MatchEngine, MatchError, MatcherConfig, QueryConfig,
};
use pretty_assertions::assert_eq;

fn titles(outcome: &jobmatch_matcher::MatchOutcome) -> Vec<&str> {
    outcome.result.jobs().map(JobRecord::title).collect()
}

#[tokio::test]
async fn test_matches_rank_by_similarity_then_catalog_order() {
    let catalog = StaticCatalog::new(sample_jobs());
    let provider = Arc::new(KeywordProvider::default());
    let engine = engine(CannedExtractor::text(RUST_CV), catalog.clone(), provider.clone());

    let outcome = engine.find_matches(b"%PDF-1.7".to_vec(), 10).await.unwrap();

    // Designer and Account Executive both score 0.0; catalog order decides.
    assert_eq!(
        titles(&outcome),
        vec![
            "Rust Engineer",
            "Data Scientist",
            "Product Designer",
            "Account Executive"
        ]
    );
    let scores: Vec<f32> = outcome.result.matches.iter().map(|m| m.score).collect();
    assert!((scores[0] - 6.0 / (5.0f32.sqrt() * 3.0)).abs() < 1e-6);
    assert!((scores[1] - 1.0 / 5.0f32.sqrt()).abs() < 1e-6);
    assert_eq!(&scores[2..], &[0.0, 0.0]);

    // One call for the four jobs, one for the query.
    assert_eq!(provider.call_count(), 2);
    assert_eq!(catalog.fetch_count(), 1);
}

#[tokio::test]
async fn test_debug_trace_describes_the_match() {
    let engine = engine(
        CannedExtractor::text(RUST_CV),
        StaticCatalog::new(sample_jobs()),
        Arc::new(KeywordProvider::default()),
    );

    let outcome = engine.find_matches(Vec::new(), 2).await.unwrap();
    let debug = &outcome.debug;

    assert_eq!(debug.text_length, RUST_CV.chars().count());
    assert_eq!(debug.text_preview, RUST_CV);
    assert_eq!(debug.total_jobs_searched, 4);
    assert_eq!(debug.embedding_dimensions, 4);
    assert_eq!(debug.model, "keyword-count");
    assert_eq!(debug.embedding_preview, keyword_vector(RUST_CV));
    assert_eq!(debug.top_scores.len(), 2);
    assert_eq!(debug.top_scores[0].job_title, "Rust Engineer");
    assert_eq!(debug.top_scores[0].company, "Acme");
    assert!((debug.top_scores[0].similarity_percent - 89.44).abs() < 1e-3);
    assert!(debug.usage.total_tokens > 0);
}

#[tokio::test]
async fn test_default_top_k_comes_from_config() {
    let config = MatcherConfig::default().with_query(QueryConfig {
        top_k: 1,
        ..Default::default()
    });
    let engine = MatchEngine::builder()
        .with_config(config)
        .with_extractor(CannedExtractor::text(RUST_CV))
        .with_catalog_source(StaticCatalog::new(sample_jobs()))
        .with_embedding_provider(Arc::new(KeywordProvider::default()))
        .build()
        .unwrap();

    let outcome = engine.find_top_matches(Vec::new()).await.unwrap();

    assert_eq!(titles(&outcome), vec!["Rust Engineer"]);
}

#[tokio::test]
async fn test_k_zero_returns_no_matches() {
    let engine = engine(
        CannedExtractor::text(RUST_CV),
        StaticCatalog::new(sample_jobs()),
        Arc::new(KeywordProvider::default()),
    );

    let outcome = engine.find_matches(Vec::new(), 0).await.unwrap();

    assert!(outcome.result.is_empty());
    assert!(outcome.debug.top_scores.is_empty());
}

#[tokio::test]
async fn test_short_text_is_rejected_before_any_provider_call() {
    let catalog = StaticCatalog::new(sample_jobs());
    let provider = Arc::new(KeywordProvider::default());
    let padded = format!("   {}   ", "x".repeat(49));
    let engine = engine(CannedExtractor::text(&padded), catalog.clone(), provider.clone());

    let err = engine.find_matches(Vec::new(), 5).await.unwrap_err();

    assert!(matches!(
        err,
        MatchError::InsufficientText {
            length: 49,
            minimum: 50
        }
    ));
    assert_eq!(provider.call_count(), 0);
    assert_eq!(catalog.fetch_count(), 0);
}

#[tokio::test]
async fn test_text_at_minimum_length_is_accepted() {
    let engine = engine(
        CannedExtractor::text(&"y".repeat(50)),
        StaticCatalog::new(sample_jobs()),
        Arc::new(KeywordProvider::default()),
    );

    let outcome = engine.find_matches(Vec::new(), 4).await.unwrap();

    // A query with no keywords has a zero vector; every score is undefined.
    assert_eq!(outcome.result.len(), 4);
    assert!(outcome.result.matches.iter().all(|m| m.score == 0.0));
    assert_eq!(
        titles(&outcome),
        sample_jobs().iter().map(JobRecord::title).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_extraction_failure_propagates() {
    let provider = Arc::new(KeywordProvider::default());
    let engine = engine(
        CannedExtractor::unreadable(),
        StaticCatalog::new(sample_jobs()),
        provider.clone(),
    );

    let err = engine.find_matches(vec![0; 16], 5).await.unwrap_err();

    assert!(matches!(
        err,
        MatchError::Extraction(ExtractionError::Parse(_))
    ));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_index_is_reused_until_cleared() {
    let catalog = StaticCatalog::new(sample_jobs());
    let provider = Arc::new(KeywordProvider::default());
    let engine = engine(CannedExtractor::text(RUST_CV), catalog.clone(), provider.clone());
    assert_eq!(engine.cache_status().await, CacheStatus::Empty);

    engine.find_matches(Vec::new(), 3).await.unwrap();
    engine.find_matches(Vec::new(), 3).await.unwrap();

    assert_eq!(catalog.fetch_count(), 1);
    assert_eq!(provider.call_count(), 3);
    assert_eq!(engine.cache_status().await, CacheStatus::Ready { jobs: 4 });

    engine.clear_cache().await;
    assert_eq!(engine.cache_status().await, CacheStatus::Empty);

    engine.find_matches(Vec::new(), 3).await.unwrap();

    assert_eq!(catalog.fetch_count(), 2);
    assert_eq!(provider.call_count(), 5);
}

#[tokio::test]
async fn test_warm_builds_the_index_up_front() {
    let catalog = StaticCatalog::new(sample_jobs());
    let engine = engine(
        CannedExtractor::text(RUST_CV),
        catalog.clone(),
        Arc::new(KeywordProvider::default()),
    );

    let index = engine.warm().await.unwrap();
    engine.find_matches(Vec::new(), 1).await.unwrap();

    assert_eq!(index.len(), 4);
    assert_eq!(index.dimension(), Some(4));
    assert_eq!(catalog.fetch_count(), 1);
}

#[tokio::test]
async fn test_catalog_failure_propagates_and_is_not_cached() {
    let catalog = StaticCatalog::failing();
    let provider = Arc::new(KeywordProvider::default());
    let engine = engine(CannedExtractor::text(RUST_CV), catalog.clone(), provider.clone());

    let err = engine.find_matches(Vec::new(), 5).await.unwrap_err();
    assert!(matches!(err, MatchError::Catalog(_)));
    assert_eq!(engine.cache_status().await, CacheStatus::Empty);

    let _ = engine.find_matches(Vec::new(), 5).await;
    assert_eq!(catalog.fetch_count(), 2);
    assert_eq!(provider.call_count(), 0);
}

/// Two dimensions for batches, three for single texts.
struct DriftingProvider;

#[async_trait]
impl EmbeddingProvider for DriftingProvider {
    fn name(&self) -> &str {
        "drifting"
    }

    fn default_model(&self) -> &str {
        "drifting"
    }

    async fn embed_batch(
        &self,
        request: EmbeddingRequest,
    ) -> jobmatch_embeddings::Result<EmbeddingResponse> {
        let dimension = if request.inputs.len() == 1 { 3 } else { 2 };
        Ok(EmbeddingResponse {
            embeddings: vec![vec![1.0; dimension]; request.inputs.len()],
            model: "drifting".to_string(),
            usage: Usage::default(),
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn test_query_dimension_mismatch_is_an_error() {
    let engine = MatchEngine::builder()
        .with_extractor(CannedExtractor::text(RUST_CV))
        .with_catalog_source(StaticCatalog::new(sample_jobs()))
        .with_embedding_provider(Arc::new(DriftingProvider))
        .build()
        .unwrap();

    let err = engine.find_matches(Vec::new(), 5).await.unwrap_err();

    assert!(matches!(
        err,
        MatchError::DimensionMismatch {
            expected: 2,
            actual: 3
        }
    ));
}

#[tokio::test]
async fn test_invalid_config_is_rejected_at_build() {
    let mut config = MatcherConfig::default();
    config.catalog.page_size = 0;

    let result = MatchEngine::builder()
        .with_config(config)
        .with_catalog_source(StaticCatalog::new(vec![job("a", "b", "c", "d")]))
        .with_embedding_provider(Arc::new(KeywordProvider::default()))
        .build();

    assert!(matches!(result, Err(MatchError::Config(_))));
}

#[tokio::test]
async fn test_engines_can_share_one_index() {
    let catalog = StaticCatalog::new(sample_jobs());
    let provider = Arc::new(KeywordProvider::default());
    let first = engine(CannedExtractor::text(RUST_CV), catalog.clone(), provider.clone());
    let second = MatchEngine::builder()
        .with_extractor(CannedExtractor::text(RUST_CV))
        .with_embedding_provider(provider.clone())
        .with_cache(Arc::clone(first.cache()))
        .build()
        .unwrap();

    first.find_matches(Vec::new(), 2).await.unwrap();
    let outcome = second.find_matches(Vec::new(), 2).await.unwrap();

    assert_eq!(titles(&outcome), vec!["Rust Engineer", "Data Scientist"]);
    assert_eq!(catalog.fetch_count(), 1);
    // One index build plus one query per engine.
    assert_eq!(provider.call_count(), 3);

    second.clear_cache().await;
    assert_eq!(first.cache_status().await, CacheStatus::Empty);
}

#[tokio::test]
async fn test_reported_length_ignores_surrounding_whitespace() {
    let padded = format!("\n\n  {RUST_CV}   \n");
    let engine = engine(
        CannedExtractor::text(&padded),
        StaticCatalog::new(sample_jobs()),
        Arc::new(KeywordProvider::default()),
    );

    let outcome = engine.find_matches(Vec::new(), 1).await.unwrap();
    assert_eq!(outcome.debug.text_length, RUST_CV.chars().count());

    let short = engine_with_text(&format!("  {}  ", "z".repeat(10)));
    match short.find_matches(Vec::new(), 1).await.unwrap_err() {
        MatchError::InsufficientText { length, .. } => assert_eq!(length, 10),
        other => panic!("unexpected error: {other}"),
    }
}

fn engine_with_text(text: &str) -> MatchEngine {
    engine(
        CannedExtractor::text(text),
        StaticCatalog::new(sample_jobs()),
        Arc::new(KeywordProvider::default()),
    )
}
