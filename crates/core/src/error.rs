//! # Errors
//!
//! Failure types for the two network boundaries. Neither escapes the
//! engines: the lookup engine folds a [`CatalogError`] into its error state
//! and the assistant turns a [`QueryError`] into a fallback answer.

use thiserror::Error;

/// Catalog load failed (transport, status, or payload)
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog service responded with status {0}")]
    Status(u16),

    #[error("catalog payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("catalog contains duplicate id {0}")]
    DuplicateId(i64),
}

/// Generative backend call failed
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no API key configured for the generative backend")]
    MissingApiKey,

    #[error("generative backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generative backend responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generative backend response could not be decoded: {0}")]
    Decode(String),
}
