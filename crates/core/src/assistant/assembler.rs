//! # Query Assembler
//!
//! Owns the current exchange and sends grounded prompts to the backend.
//! At most one exchange is pending; `ask` while pending is rejected.
//! Every request carries the generation current when it was issued, and
//! its result is applied only if that generation is still current, so a
//! `clear` (or a newer `ask`) silently discards a late answer.
//! Every change to the exchange is also published on a watch channel.

use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::backend::GenerativeBackend;
use super::exchange::{cap_question, QueryExchange, BACKEND_UNREACHABLE, NO_ANSWER};
use super::grounding::{build_context, GroundingPolicy};
use super::prompts::{self, PRESETS};
use crate::catalog::CatalogCache;

/// What happened to an `ask` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome {
    /// Blank question (or unknown preset); nothing changed
    Ignored,
    /// Another exchange is pending; nothing changed
    Busy,
    Answered,
    /// Backend succeeded without usable text
    NoAnswer,
    /// Backend call failed
    Failed,
    /// Exchange was cleared or replaced before the answer arrived
    Superseded,
}

#[derive(Default)]
struct ExchangeSlot {
    exchange: QueryExchange,
    generation: u64,
}

/// Grounded question assistant
pub struct QueryAssembler {
    backend: Arc<dyn GenerativeBackend>,
    catalog: Arc<CatalogCache>,
    policy: GroundingPolicy,
    slot: Mutex<ExchangeSlot>,
    updates: watch::Sender<QueryExchange>,
}

impl QueryAssembler {
    pub fn new(backend: Arc<dyn GenerativeBackend>, catalog: Arc<CatalogCache>) -> Self {
        Self {
            backend,
            catalog,
            policy: GroundingPolicy::default(),
            slot: Mutex::new(ExchangeSlot::default()),
            updates: watch::Sender::new(QueryExchange::default()),
        }
    }

    pub fn with_policy(mut self, policy: GroundingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Load the catalog for grounding; failures are logged and ignored
    pub async fn warm(&self) {
        match self.catalog.get().await {
            Ok(snapshot) => tracing::debug!(entries = snapshot.len(), "Grounding catalog ready"),
            Err(e) => {
                tracing::warn!(error = %e, "Grounding catalog unavailable, continuing without it")
            }
        }
    }

    /// Run [`Self::warm`] in the background
    pub fn spawn_warm(self: &Arc<Self>) -> JoinHandle<()> {
        let assistant = Arc::clone(self);
        tokio::spawn(async move { assistant.warm().await })
    }

    /// Snapshot of the current exchange
    pub async fn exchange(&self) -> QueryExchange {
        self.slot.lock().await.exchange.clone()
    }

    /// Watch exchange transitions (pending, resolved, cleared)
    pub fn subscribe(&self) -> watch::Receiver<QueryExchange> {
        self.updates.subscribe()
    }

    /// Prompt that would be sent for `question` right now
    pub async fn compose_prompt(&self, question: &str) -> String {
        let snapshot = self.catalog.peek().await;
        let context = build_context(snapshot.as_deref(), &self.policy);
        prompts::compose(&context.text, question)
    }

    /// Ask a question
    ///
    /// Returns once the exchange is resolved (or the request is discarded).
    #[tracing::instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn ask(&self, question: &str) -> AskOutcome {
        let question = cap_question(question);
        if question.trim().is_empty() {
            return AskOutcome::Ignored;
        }

        let generation = {
            let mut slot = self.slot.lock().await;
            if slot.exchange.is_pending() {
                tracing::debug!("Exchange already pending, rejecting ask");
                return AskOutcome::Busy;
            }
            slot.generation += 1;
            slot.exchange = QueryExchange::pending(question.clone());
            self.updates.send_replace(slot.exchange.clone());
            slot.generation
        };

        let prompt = self.compose_prompt(&question).await;
        let (answer, outcome) = match self.backend.generate(&prompt).await {
            Ok(Some(text)) if !text.trim().is_empty() => (text, AskOutcome::Answered),
            Ok(_) => (NO_ANSWER.to_string(), AskOutcome::NoAnswer),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    model = %self.backend.model(),
                    "Assistant query failed"
                );
                (BACKEND_UNREACHABLE.to_string(), AskOutcome::Failed)
            }
        };

        let mut slot = self.slot.lock().await;
        if slot.generation != generation {
            tracing::debug!(generation, current = slot.generation, "Discarding stale answer");
            return AskOutcome::Superseded;
        }
        slot.exchange.resolve(answer);
        self.updates.send_replace(slot.exchange.clone());
        outcome
    }

    /// Ask one of the canned [`PRESETS`]
    pub async fn ask_preset(&self, index: usize) -> AskOutcome {
        match PRESETS.get(index) {
            Some(question) => self.ask(question).await,
            None => AskOutcome::Ignored,
        }
    }

    /// Reset to an idle, empty exchange
    ///
    /// An in-flight request keeps running but its answer will be discarded.
    pub async fn clear(&self) {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        slot.exchange = QueryExchange::default();
        self.updates.send_replace(slot.exchange.clone());
    }
}
