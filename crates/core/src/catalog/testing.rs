//! Test fixtures shared by the catalog and assistant tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::model::{CatalogEntry, CatalogSnapshot};
use super::rarity::RarityTier;
use super::source::CatalogSource;
use crate::error::CatalogError;

pub fn entry(id: i64, name: &str, category: Option<&str>) -> CatalogEntry {
    CatalogEntry {
        id,
        name: name.to_string(),
        category: category.map(str::to_string),
        rarity: RarityTier::Common,
        ..Default::default()
    }
}

/// Shelly (id 1) and Spike (id 16), both fighters
pub fn sample_snapshot() -> CatalogSnapshot {
    CatalogSnapshot::new(vec![
        entry(1, "Shelly", Some("Fighter")),
        entry(16, "Spike", Some("Fighter")),
    ])
    .unwrap()
}

/// Catalog source returning a canned result and counting calls
pub struct StubSource {
    result: Result<CatalogSnapshot, u16>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn ok(snapshot: CatalogSnapshot) -> Self {
        Self {
            result: Ok(snapshot),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            result: Err(status),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay_ms(mut self, millis: u64) -> Self {
        self.delay = Some(Duration::from_millis(millis));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StubSource {
    async fn fetch(&self) -> Result<CatalogSnapshot, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.result {
            Ok(snapshot) => Ok(snapshot.clone()),
            Err(status) => Err(CatalogError::Status(*status)),
        }
    }
}
