//! # Job Catalog
//!
//! Typed job records and paginated loading of the full job catalog.
//!
//! ```text
//! CatalogLoader ──► CatalogSource::fetch_page(0..) ──► Vec<JobRecord>
//!                        │
//!                        ▼
//!                 HttpCatalogSource (GET /jobs?page=&pageSize=)
//! ```

pub mod error;
pub mod loader;
pub mod record;
pub mod source;

pub use error::{CatalogError, Result};
pub use loader::{CatalogLoader, DEFAULT_PAGE_SIZE};
pub use record::{JobId, JobRecord};
pub use source::{CatalogSource, DEFAULT_CATALOG_URL, HttpCatalogSource};
