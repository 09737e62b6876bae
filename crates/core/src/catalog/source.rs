//! # Catalog Source
//!
//! The one place the catalog is fetched from the network. Everything else
//! reads snapshots through [`super::CatalogCache`].

use async_trait::async_trait;
use std::time::Duration;

use super::model::CatalogSnapshot;
use crate::error::CatalogError;

/// Default catalog listing endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://api.brawlify.com/v1/brawlers";

/// Something that can produce a fresh catalog snapshot
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<CatalogSnapshot, CatalogError>;
}

/// Fetches the catalog with a single HTTP GET
pub struct HttpCatalogSource {
    url: String,
    client: reqwest::Client,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("brawldex/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<CatalogSnapshot, CatalogError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let snapshot = CatalogSnapshot::from_json(&body)?;
        tracing::debug!(entries = snapshot.len(), "Catalog fetched");
        Ok(snapshot)
    }
}
