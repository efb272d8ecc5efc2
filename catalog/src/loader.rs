//! Full-catalog loading.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::record::JobRecord;
use crate::source::CatalogSource;

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Walks a [`CatalogSource`] page by page until it runs dry.
#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    page_size: usize,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the page size (at least 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch every job in the catalog, in catalog order.
    ///
    /// Pages are requested from 0 upward. A page that is not exactly full
    /// (including an empty one) ends the walk. If any page fails, the records
    /// gathered so far are dropped and the error is returned.
    pub async fn fetch_all_jobs(&self) -> Result<Vec<JobRecord>> {
        let mut jobs = Vec::new();
        let mut page = 0;

        loop {
            let records = self.source.fetch_page(page, self.page_size).await?;
            let fetched = records.len();
            debug!("Catalog page {page} returned {fetched} jobs");

            jobs.extend(records);
            if fetched != self.page_size {
                break;
            }
            page += 1;
        }

        info!("Fetched {} jobs from {} catalog pages", jobs.len(), page + 1);
        Ok(jobs)
    }
}
