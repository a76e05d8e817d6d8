//! Category catalog accessors
//!
//! The catalog is fetched fresh for every classification; nothing is cached across requests.

use crate::config::CatalogConfig;
use async_trait::async_trait;
use hakim_core::error::truncate_detail;
use hakim_core::{Category, Error, Result};
use tracing::debug;
use url::Url;

/// Read-only source of active categories
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the active categories in catalog order.
    ///
    /// An empty list is a valid result.
    async fn fetch_active_categories(&self) -> Result<Vec<Category>>;

    /// Get the source name
    fn name(&self) -> &str;
}

/// Catalog backed by the REST data store
pub struct RestCatalog {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl RestCatalog {
    const CATEGORIES_PATH: &'static str = "rest/v1/categories";

    /// Create a catalog client from configuration
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("failed to build catalog client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: Self::endpoint(&config.base_url)?,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(base_url: &str) -> Result<Url> {
        let mut base = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid catalog base_url {:?}: {}", base_url, e)))?;

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut endpoint = base
            .join(Self::CATEGORIES_PATH)
            .map_err(|e| Error::config(format!("invalid catalog base_url {:?}: {}", base_url, e)))?;

        endpoint
            .query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("is_active", "eq.true")
            .append_pair("order", "name_ar.asc");

        Ok(endpoint)
    }

    /// Full query URL used for each fetch
    pub fn url(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CatalogSource for RestCatalog {
    async fn fetch_active_categories(&self) -> Result<Vec<Category>> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::catalog(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::catalog(format!(
                "status {}: {}",
                status.as_u16(),
                truncate_detail(&body)
            )));
        }

        let categories: Vec<Category> = response
            .json()
            .await
            .map_err(|e| Error::catalog(format!("malformed response: {}", e)))?;

        let active: Vec<Category> = categories.into_iter().filter(|c| c.is_active).collect();
        debug!(count = active.len(), "Fetched active categories");

        Ok(active)
    }

    fn name(&self) -> &str {
        "rest"
    }
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    categories: Vec<Category>,
}

impl StaticCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_active_categories(&self) -> Result<Vec<Category>> {
        Ok(self
            .categories
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}
