//! # Job Matcher
//!
//! Matches an uploaded résumé against every job in the catalog by comparing
//! embedding vectors:
//!
//! - **Extraction**: PDF bytes become plain text off the async runtime
//! - **Index Cache**: The catalog is fetched and embedded once, then reused
//! - **Ranking**: Cosine similarity with a stable, catalog-ordered top-k
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Match Engine                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐          │
//! │  │     Text     │  │ Vector Index │  │  Embedding   │          │
//! │  │  Extractor   │  │    Cache     │  │    Client    │          │
//! │  └──────────────┘  └──────────────┘  └──────────────┘          │
//! │         │                │                  │                   │
//! │         │          CatalogLoader            │                   │
//! │         │                │                  │                   │
//! │         └────────────────┼──────────────────┘                   │
//! │                          ▼                                      │
//! │                  ┌──────────────┐                               │
//! │                  │    Ranker    │                               │
//! │                  └──────────────┘                               │
//! │                          │                                      │
//! │                          ▼                                      │
//! │              MatchResult + DebugTrace                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jobmatch_matcher::{MatchEngine, MatcherConfig};
//!
//! let engine = MatchEngine::new(MatcherConfig::default().with_env_overrides())?;
//!
//! let outcome = engine.find_matches(std::fs::read("cv.pdf")?, 10).await?;
//! for m in &outcome.result.matches {
//!     println!("{:.3} {}", m.score, m.job.title());
//! }
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod index;
pub mod ranker;
pub mod trace;

pub use cache::{CacheStatus, VectorIndexCache};
pub use config::{CatalogConfig, EmbeddingConfig, MatcherConfig, QueryConfig};
pub use engine::{MatchEngine, MatchEngineBuilder, MatchOutcome};
pub use error::{ExtractionError, MatchError, Result};
pub use extract::{PdfExtractor, TextExtractor, extract_text};
pub use index::VectorIndex;
pub use ranker::{JobMatch, MatchResult, rank};
pub use trace::{DebugTrace, TopScore};

// Re-export the pieces callers need to plug in their own collaborators.
pub use jobmatch_catalog::{CatalogSource, JobRecord};
pub use jobmatch_embeddings::{EmbeddingProvider, Usage};
