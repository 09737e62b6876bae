//! # Catalog Cache
//!
//! A single lazily-loaded snapshot shared by the lookup engine and the
//! assistant. Readers get an `Arc<CatalogSnapshot>`; replacing the cached
//! snapshot never disturbs a reader still holding the previous one.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::model::CatalogSnapshot;
use super::source::CatalogSource;
use crate::error::CatalogError;

/// Shared, read-only view of the remote catalog
pub struct CatalogCache {
    source: Arc<dyn CatalogSource>,
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
    // Held for the duration of a fetch so only one is ever in flight
    fetch_lock: Mutex<()>,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            current: RwLock::new(None),
            fetch_lock: Mutex::new(()),
        }
    }

    /// The cached snapshot, without fetching
    pub async fn peek(&self) -> Option<Arc<CatalogSnapshot>> {
        self.current.read().await.clone()
    }

    /// The cached snapshot, fetching it first if nothing is cached
    ///
    /// Concurrent first callers share one fetch. Failures are not cached;
    /// the next call tries again.
    pub async fn get(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        if let Some(snapshot) = self.peek().await {
            return Ok(snapshot);
        }

        let _guard = self.fetch_lock.lock().await;
        if let Some(snapshot) = self.peek().await {
            return Ok(snapshot);
        }
        self.fetch_locked().await
    }

    /// Drop the cached snapshot and fetch a new one
    ///
    /// On failure the cache is left empty.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let _guard = self.fetch_lock.lock().await;
        self.current.write().await.take();
        self.fetch_locked().await
    }

    /// Forget the cached snapshot; the next `get` refetches
    pub async fn invalidate(&self) {
        if self.current.write().await.take().is_some() {
            tracing::debug!("Catalog cache invalidated");
        }
    }

    async fn fetch_locked(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let snapshot = Arc::new(self.source.fetch().await?);
        *self.current.write().await = Some(Arc::clone(&snapshot));
        tracing::info!(entries = snapshot.len(), "Catalog snapshot cached");
        Ok(snapshot)
    }
}
