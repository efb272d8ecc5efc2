//! Test doubles shared by the matcher integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use jobmatch_catalog::{CatalogError, CatalogSource, JobRecord};
use jobmatch_embeddings::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, Usage};
use jobmatch_matcher::{ExtractionError, MatchEngine, MatcherConfig, TextExtractor};
use tokio::sync::Notify;

/// Words whose occurrence counts make up a keyword embedding.
pub const KEYWORDS: [&str; 4] = ["rust", "python", "design", "sales"];

/// Long enough to clear the minimum-text check; leans rust, then python.
pub const RUST_CV: &str = "Systems programmer with six years of Rust experience, \
    shipping Rust services in production and the occasional Python script.";

pub fn job(title: &str, company: &str, description: &str, requirements: &str) -> JobRecord {
    JobRecord {
        job_title: Some(title.to_string()),
        company: Some(company.to_string()),
        description: Some(description.to_string()),
        requirements: Some(requirements.to_string()),
        location: Some("Remote".to_string()),
        ..Default::default()
    }
}

/// Four jobs, one per keyword, in catalog order.
pub fn sample_jobs() -> Vec<JobRecord> {
    vec![
        job("Product Designer", "Initech", "Design interfaces", "figma"),
        job("Rust Engineer", "Acme", "Build rust services", "rust, tokio"),
        job("Account Executive", "Umbrella", "Sales pipeline", "sales, crm"),
        job("Data Scientist", "Globex", "Python notebooks", "python, pandas"),
    ]
}

/// Count of each keyword in `text`, case-insensitively.
pub fn keyword_vector(text: &str) -> Vec<f32> {
    let text = text.to_lowercase();
    KEYWORDS
        .iter()
        .map(|keyword| text.matches(keyword).count() as f32)
        .collect()
}

/// In-memory catalog that counts page fetches.
///
/// When built with [`StaticCatalog::gated`], the first fetch signals
/// `started` and then blocks until `release` is notified.
pub struct StaticCatalog {
    jobs: Vec<JobRecord>,
    fail: bool,
    gate_armed: AtomicBool,
    pub started: Notify,
    pub release: Notify,
    pub fetches: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl StaticCatalog {
    pub fn new(jobs: Vec<JobRecord>) -> Arc<Self> {
        Arc::new(Self::with(jobs, false, false))
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::with(Vec::new(), true, false))
    }

    pub fn gated(jobs: Vec<JobRecord>) -> Arc<Self> {
        Arc::new(Self::with(jobs, false, true))
    }

    pub fn gated_failing() -> Arc<Self> {
        Arc::new(Self::with(Vec::new(), true, true))
    }

    fn with(jobs: Vec<JobRecord>, fail: bool, gated: bool) -> Self {
        Self {
            jobs,
            fail,
            gate_armed: AtomicBool::new(gated),
            started: Notify::new(),
            release: Notify::new(),
            fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> jobmatch_catalog::Result<Vec<JobRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if self.gate_armed.swap(false, Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        // Let queued callers pile up behind this fetch.
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(CatalogError::Status {
                page,
                status: 503,
                body: "catalog down".to_string(),
            });
        }

        let start = (page * page_size).min(self.jobs.len());
        let end = (start + page_size).min(self.jobs.len());
        Ok(self.jobs[start..end].to_vec())
    }
}

/// Embeds text as keyword counts and counts calls and inputs.
#[derive(Default)]
pub struct KeywordProvider {
    pub calls: AtomicUsize,
    pub inputs: AtomicUsize,
}

impl KeywordProvider {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordProvider {
    fn name(&self) -> &str {
        "keyword"
    }

    fn default_model(&self) -> &str {
        "keyword-count"
    }

    async fn embed_batch(
        &self,
        request: EmbeddingRequest,
    ) -> jobmatch_embeddings::Result<EmbeddingResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.fetch_add(request.inputs.len(), Ordering::SeqCst);

        let tokens = request
            .inputs
            .iter()
            .map(|text| text.split_whitespace().count() as u64)
            .sum();
        Ok(EmbeddingResponse {
            embeddings: request.inputs.iter().map(|text| keyword_vector(text)).collect(),
            model: "keyword-count".to_string(),
            usage: Usage {
                prompt_tokens: tokens,
                total_tokens: tokens,
            },
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Returns the same text (or error) for any document.
pub struct CannedExtractor {
    text: Option<String>,
}

impl CannedExtractor {
    pub fn text(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Some(text.to_string()),
        })
    }

    pub fn unreadable() -> Arc<Self> {
        Arc::new(Self { text: None })
    }
}

impl TextExtractor for CannedExtractor {
    fn extract(&self, _document: &[u8]) -> Result<String, ExtractionError> {
        self.text
            .clone()
            .ok_or_else(|| ExtractionError::Parse("no text layer".to_string()))
    }
}

pub fn engine(
    extractor: Arc<CannedExtractor>,
    catalog: Arc<StaticCatalog>,
    provider: Arc<KeywordProvider>,
) -> MatchEngine {
    MatchEngine::builder()
        .with_config(MatcherConfig::default())
        .with_extractor(extractor)
        .with_catalog_source(catalog)
        .with_embedding_provider(provider)
        .build()
        .unwrap()
}
