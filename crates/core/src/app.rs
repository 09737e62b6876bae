//! # Brawldex Runtime
//!
//! Wires one shared catalog cache to the lookup engine and the assistant.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::assistant::{GeminiBackend, GenerativeBackend, QueryAssembler};
use crate::catalog::{lookup, CatalogCache, CatalogSource, HttpCatalogSource, LookupEngine};
use crate::config::BrawldexConfig;

/// Both subsystems over one catalog cache
pub struct Brawldex {
    pub config: BrawldexConfig,
    pub catalog: Arc<CatalogCache>,
    pub lookup: Arc<RwLock<LookupEngine>>,
    pub assistant: Arc<QueryAssembler>,
}

impl Brawldex {
    /// Build the HTTP catalog source and Gemini backend from `config`
    pub fn from_config(config: BrawldexConfig) -> Result<Self> {
        let source = HttpCatalogSource::new(&config.catalog_url, config.http_timeout())
            .context("Failed to create catalog HTTP client")?;
        let backend =
            GeminiBackend::new(config.api_key.clone(), &config.model, config.http_timeout())
                .context("Failed to create Gemini HTTP client")?
                .with_base_url(&config.gemini_base_url);

        if !backend.has_api_key() {
            tracing::warn!("No Gemini API key configured; questions will fail until one is set");
        }

        Ok(Self::with_parts(config, Arc::new(source), Arc::new(backend)))
    }

    pub fn with_parts(
        config: BrawldexConfig,
        source: Arc<dyn CatalogSource>,
        backend: Arc<dyn GenerativeBackend>,
    ) -> Self {
        let catalog = Arc::new(CatalogCache::new(source));
        let assistant = Arc::new(
            QueryAssembler::new(backend, Arc::clone(&catalog)).with_policy(config.grounding),
        );
        Self {
            config,
            catalog,
            lookup: Arc::new(RwLock::new(LookupEngine::new())),
            assistant,
        }
    }

    /// Startup: warm grounding in the background and load the lookup engine
    pub async fn start(&self) {
        self.assistant.spawn_warm();
        lookup::load(&self.lookup, &self.catalog).await;
    }

    /// Refetch the catalog for both subsystems
    pub async fn refresh_catalog(&self) {
        lookup::refresh(&self.lookup, &self.catalog).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{sample_snapshot, StubSource};
    use crate::catalog::SelectionState;
    use crate::error::QueryError;
    use async_trait::async_trait;

    struct EchoBackend;

    #[async_trait]
    impl GenerativeBackend for EchoBackend {
        fn model(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<Option<String>, QueryError> {
            Ok(Some(prompt.to_string()))
        }
    }

    #[tokio::test]
    async fn test_start_shares_one_fetch() {
        let source = Arc::new(StubSource::ok(sample_snapshot()));
        let app = Brawldex::with_parts(
            BrawldexConfig::default(),
            source.clone(),
            Arc::new(EchoBackend),
        );

        app.start().await;
        app.assistant.warm().await;

        assert!(matches!(
            app.lookup.read().await.state(),
            SelectionState::Selected(e) if e.name == "Shelly"
        ));
        assert_eq!(source.calls(), 1);

        app.assistant.ask("Who is fastest?").await;
        let answer = app.assistant.exchange().await.answer_text;
        assert!(answer.contains("Shelly (Category: Fighter), Spike (Category: Fighter)"));
    }

    #[tokio::test]
    async fn test_refresh_catalog_refetches() {
        let source = Arc::new(StubSource::ok(sample_snapshot()));
        let app = Brawldex::with_parts(
            BrawldexConfig::default(),
            source.clone(),
            Arc::new(EchoBackend),
        );

        app.start().await;
        app.refresh_catalog().await;
        assert_eq!(source.calls(), 2);
        assert_eq!(app.lookup.read().await.catalog_len(), 2);
    }
}
