//! Where catalog pages come from.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::record::JobRecord;

/// Base URL of the public job catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://yon9jygrt9.execute-api.eu-west-1.amazonaws.com/prod";

/// A paginated source of job records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch page `page` (zero-based) holding at most `page_size` records.
    async fn fetch_page(&self, page: usize, page_size: usize) -> Result<Vec<JobRecord>>;
}

/// Catalog served over HTTP as `GET {base_url}/jobs?page=N&pageSize=M`.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, ...).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpCatalogSource {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_page(&self, page: usize, page_size: usize) -> Result<Vec<JobRecord>> {
        debug!("Fetching catalog page {page} (page size {page_size})");

        let response = self
            .client
            .get(format!("{}/jobs", self.base_url))
            .query(&[("page", page), ("pageSize", page_size)])
            .send()
            .await
            .map_err(|source| CatalogError::Request { page, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                page,
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| CatalogError::Request { page, source })?;
        let body: CatalogPage =
            serde_json::from_str(&text).map_err(|source| CatalogError::Parse { page, source })?;

        Ok(body.data.unwrap_or_default())
    }
}

/// Wire format of one catalog page.
#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    data: Option<Vec<JobRecord>>,
}
