//! A single question/answer exchange with the assistant.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Longest question accepted; longer input is cut at this many characters
pub const MAX_QUESTION_CHARS: usize = 200;

/// Answer shown when the backend succeeds without usable text
pub const NO_ANSWER: &str = "no answer could be obtained";

/// Answer shown when the backend call fails
pub const BACKEND_UNREACHABLE: &str = "the assistant could not be reached — please try again";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    #[default]
    Idle,
    Pending,
    Done,
}

/// Question text, answer text (empty until resolved) and status
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryExchange {
    pub question_text: String,
    pub answer_text: String,
    pub status: ExchangeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
}

impl QueryExchange {
    pub(crate) fn pending(question: String) -> Self {
        Self {
            question_text: question,
            answer_text: String::new(),
            status: ExchangeStatus::Pending,
            answered_at: None,
        }
    }

    pub(crate) fn resolve(&mut self, answer: String) {
        self.answer_text = answer;
        self.status = ExchangeStatus::Done;
        self.answered_at = Some(Utc::now());
    }

    pub fn is_pending(&self) -> bool {
        self.status == ExchangeStatus::Pending
    }
}

/// Cut `question` to [`MAX_QUESTION_CHARS`] characters
pub fn cap_question(question: &str) -> String {
    question.chars().take(MAX_QUESTION_CHARS).collect()
}
