//! # Generative Backend
//!
//! One text prompt in, at most one text answer out. The Gemini
//! implementation talks to the Generative Language REST API directly.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::error::QueryError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// A language model that answers a single prompt
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Generate an answer; `Ok(None)` means the call succeeded without usable text
    async fn generate(&self, prompt: &str) -> Result<Option<String>, QueryError>;
}

/// Gemini `generateContent` client (API key based)
pub struct GeminiBackend {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            model: model.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            client,
        })
    }

    /// Point at a different API host (proxies, test servers)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(
        skip(self, prompt),
        fields(model = %self.model, prompt_len = prompt.len())
    )]
    async fn generate(&self, prompt: &str) -> Result<Option<String>, QueryError> {
        let api_key = self.api_key.as_deref().ok_or(QueryError::MissingApiKey)?;

        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))?;
        Ok(extract_text(&json))
    }
}

/// Concatenated text parts of the first candidate, if any are non-blank
pub fn extract_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
