//! # Events
//!
//! State-change notifications published to clients watching the engines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Kind of state change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppEventKind {
    /// Catalog fetch started
    CatalogLoading,
    /// Catalog fetch finished (successfully or not)
    CatalogLoaded,
    /// A search selected an entry
    SelectionChanged,
    /// A search matched nothing
    LookupMissed,
    /// A question was sent and awaits its answer
    QuestionPending,
    /// The current exchange received its answer
    AnswerReady,
    /// The exchange was reset
    ExchangeCleared,
}

/// One published state change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEvent {
    /// Process-unique, increasing sequence number
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: AppEventKind,
    /// Current state after the change (JSON)
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

impl AppEvent {
    pub fn new(kind: AppEventKind) -> Self {
        Self {
            seq: NEXT_SEQ.fetch_add(1, Ordering::Relaxed),
            timestamp: Utc::now(),
            kind,
            data: None,
        }
    }

    /// Attach the post-change state
    pub fn with_data(mut self, data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => self.data = Some(value),
            Err(e) => {
                tracing::warn!(error = %e, kind = ?self.kind, "Event payload not serializable")
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = AppEvent::new(AppEventKind::SelectionChanged);
        assert_eq!(event.kind, AppEventKind::SelectionChanged);
        assert!(event.data.is_none());
    }

    #[test]
    fn test_sequence_increases() {
        let a = AppEvent::new(AppEventKind::CatalogLoading);
        let b = AppEvent::new(AppEventKind::AnswerReady);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_kind_names() {
        let json = serde_json::to_string(&AppEventKind::QuestionPending).unwrap();
        assert_eq!(json, "\"question_pending\"");
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::new(AppEventKind::LookupMissed)
            .with_data(serde_json::json!({ "query": "zzz" }));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("lookup_missed"));
        assert!(json.contains("zzz"));
    }
}
