//! Process-wide cache of the job vector index.
//!
//! The cache moves through `Empty -> Building -> Ready` and back to `Empty`
//! on [`VectorIndexCache::clear`]. Only one build runs at a time: callers that
//! miss while a build is in flight wait for it and share its result.

use std::sync::Arc;

use jobmatch_catalog::{CatalogLoader, JobRecord};
use jobmatch_embeddings::EmbeddingClient;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::index::VectorIndex;

/// Observable state of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CacheStatus {
    /// No index; the next access builds one.
    Empty,
    /// A build is in flight.
    Building,
    /// An index is cached.
    Ready { jobs: usize },
}

#[derive(Default)]
struct CacheSlot {
    index: Option<Arc<VectorIndex>>,

    /// Bumped by every `clear`; a build only stores its result if no clear
    /// happened since it started.
    generation: u64,
}

/// Memoizes the (jobs, embeddings) pair behind a single-flight build.
pub struct VectorIndexCache {
    loader: CatalogLoader,
    embedder: EmbeddingClient,
    slot: RwLock<CacheSlot>,
    build_lock: Mutex<()>,
}

impl VectorIndexCache {
    pub fn new(loader: CatalogLoader, embedder: EmbeddingClient) -> Self {
        Self {
            loader,
            embedder,
            slot: RwLock::new(CacheSlot::default()),
            build_lock: Mutex::new(()),
        }
    }

    /// Return the cached index, building it first if there is none.
    ///
    /// A failed build leaves the cache empty and returns the failure. Callers
    /// that were queued behind it then make their own attempts, one at a time.
    pub async fn get_or_build(&self) -> Result<Arc<VectorIndex>> {
        if let Some(index) = self.cached().await {
            return Ok(index);
        }

        let _build = self.build_lock.lock().await;

        if let Some(index) = self.cached().await {
            debug!("Using job index built by a concurrent request");
            return Ok(index);
        }

        let generation = self.slot.read().await.generation;
        info!("Building job vector index");

        let index = Arc::new(self.build().await?);

        let mut slot = self.slot.write().await;
        if slot.generation == generation {
            slot.index = Some(Arc::clone(&index));
            info!(
                "Cached job vector index: {} jobs, {} dimensions, model {}",
                index.len(),
                index.dimension().unwrap_or_default(),
                index.model()
            );
        } else {
            warn!("Job index cache was cleared during the build; result not cached");
        }

        Ok(index)
    }

    /// Drop the cached index. The next access rebuilds from scratch.
    pub async fn clear(&self) {
        let mut slot = self.slot.write().await;
        slot.index = None;
        slot.generation = slot.generation.wrapping_add(1);
        info!("Cleared job vector index cache");
    }

    pub async fn status(&self) -> CacheStatus {
        if let Some(index) = self.slot.read().await.index.as_ref() {
            return CacheStatus::Ready { jobs: index.len() };
        }

        if self.build_lock.try_lock().is_err() {
            CacheStatus::Building
        } else {
            CacheStatus::Empty
        }
    }

    async fn cached(&self) -> Option<Arc<VectorIndex>> {
        self.slot.read().await.index.clone()
    }

    async fn build(&self) -> Result<VectorIndex> {
        let jobs = self.loader.fetch_all_jobs().await?;
        let texts: Vec<String> = jobs.iter().map(JobRecord::compose_text).collect();
        let batch = self.embedder.embed(&texts).await?;

        VectorIndex::new(jobs, batch.embeddings, batch.model, batch.usage)
    }
}
