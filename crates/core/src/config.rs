//! # Configuration
//!
//! Runtime settings, read from the environment after an optional `.env`
//! file is loaded. Every field has a default except the backend API key.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::assistant::backend::{DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL};
use crate::assistant::GroundingPolicy;
use crate::catalog::DEFAULT_CATALOG_URL;

pub const ENV_CATALOG_URL: &str = "BRAWLDEX_CATALOG_URL";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// Key name used by the mobile client's build environment
pub const ENV_API_KEY_LEGACY: &str = "EXPO_PUBLIC_GEMINI_API_KEY";
pub const ENV_MODEL: &str = "BRAWLDEX_MODEL";
pub const ENV_GEMINI_BASE_URL: &str = "BRAWLDEX_GEMINI_BASE_URL";
pub const ENV_HTTP_TIMEOUT: &str = "BRAWLDEX_HTTP_TIMEOUT_SECS";
pub const ENV_GROUNDING_MAX_ENTRIES: &str = "BRAWLDEX_GROUNDING_MAX_ENTRIES";
pub const ENV_GROUNDING_MAX_CHARS: &str = "BRAWLDEX_GROUNDING_MAX_CHARS";

/// Settings for the catalog source, backend and grounding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrawldexConfig {
    /// Catalog listing endpoint
    pub catalog_url: String,
    /// Gemini API key; never serialized
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Model identifier sent with every question
    pub model: String,
    /// Generative Language API host
    pub gemini_base_url: String,
    /// Timeout applied to every outbound request
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub grounding: GroundingPolicy,
}

impl Default for BrawldexConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            http_timeout_secs: 30,
            grounding: GroundingPolicy::default(),
        }
    }
}

impl BrawldexConfig {
    /// Load `.env` (if present) and read the process environment
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
        }
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(url) = get(ENV_CATALOG_URL) {
            config.catalog_url = url;
        }
        config.api_key = get(ENV_API_KEY).or_else(|| get(ENV_API_KEY_LEGACY));
        if let Some(model) = get(ENV_MODEL) {
            config.model = model;
        }
        if let Some(url) = get(ENV_GEMINI_BASE_URL) {
            config.gemini_base_url = url;
        }
        if let Some(secs) = parse_number(ENV_HTTP_TIMEOUT, get(ENV_HTTP_TIMEOUT)) {
            config.http_timeout_secs = secs;
        }
        if let Some(n) = parse_number(ENV_GROUNDING_MAX_ENTRIES, get(ENV_GROUNDING_MAX_ENTRIES)) {
            config.grounding.max_entries = n;
        }
        if let Some(n) = parse_number(ENV_GROUNDING_MAX_CHARS, get(ENV_GROUNDING_MAX_CHARS)) {
            config.grounding.max_chars = n;
        }
        config
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(key, value = %value, "Ignoring non-numeric setting");
            None
        }
    }
}
