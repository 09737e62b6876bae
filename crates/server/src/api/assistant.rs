//! # Assistant API
//!
//! Endpoints for the grounded question assistant.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use brawldex_core::assistant::{AskOutcome, QueryExchange, PRESETS};
use brawldex_core::events::{AppEvent, AppEventKind};

use crate::SharedState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ExchangeView {
    #[schema(value_type = Object)]
    pub exchange: QueryExchange,
    /// Model answering questions
    pub model: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AskRequest {
    /// Free-text question (ignored when `preset` is set)
    pub question: Option<String>,
    /// Index into the preset questions
    pub preset: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AskResponse {
    /// `ignored`, `busy`, `answered`, `no_answer`, `failed` or `superseded`
    pub outcome: String,
    #[schema(value_type = Object)]
    pub exchange: QueryExchange,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresetsResponse {
    pub presets: Vec<String>,
}

pub fn assistant_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_exchange))
        .route("/ask", post(ask))
        .route("/clear", post(clear))
        .route("/presets", get(list_presets))
}

pub fn outcome_label(outcome: AskOutcome) -> &'static str {
    match outcome {
        AskOutcome::Ignored => "ignored",
        AskOutcome::Busy => "busy",
        AskOutcome::Answered => "answered",
        AskOutcome::NoAnswer => "no_answer",
        AskOutcome::Failed => "failed",
        AskOutcome::Superseded => "superseded",
    }
}

/// Get the current exchange
#[utoipa::path(
    get,
    path = "/api/v1/assistant",
    tag = "assistant",
    responses(
        (status = 200, description = "Current exchange", body = ExchangeView)
    )
)]
pub async fn get_exchange(State(state): State<SharedState>) -> Json<ExchangeView> {
    Json(ExchangeView {
        exchange: state.app.assistant.exchange().await,
        model: state.app.assistant.model().to_string(),
    })
}

/// Ask a question; responds once the answer is in
#[utoipa::path(
    post,
    path = "/api/v1/assistant/ask",
    tag = "assistant",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Exchange after the ask", body = AskResponse)
    )
)]
pub async fn ask(
    State(state): State<SharedState>,
    Json(req): Json<AskRequest>,
) -> Json<AskResponse> {
    let assistant = &state.app.assistant;
    let outcome = match (req.preset, req.question.as_deref()) {
        (Some(index), _) => assistant.ask_preset(index).await,
        (None, Some(question)) => assistant.ask(question).await,
        (None, None) => AskOutcome::Ignored,
    };

    let exchange = assistant.exchange().await;
    if matches!(
        outcome,
        AskOutcome::Answered | AskOutcome::NoAnswer | AskOutcome::Failed
    ) {
        state.publish(AppEvent::new(AppEventKind::AnswerReady).with_data(&exchange));
    }

    Json(AskResponse {
        outcome: outcome_label(outcome).to_string(),
        exchange,
    })
}

/// Reset the exchange; a pending answer will be discarded
#[utoipa::path(
    post,
    path = "/api/v1/assistant/clear",
    tag = "assistant",
    responses(
        (status = 200, description = "Exchange cleared", body = ExchangeView)
    )
)]
pub async fn clear(State(state): State<SharedState>) -> Json<ExchangeView> {
    state.app.assistant.clear().await;
    state.publish(AppEvent::new(AppEventKind::ExchangeCleared));
    get_exchange(State(state)).await
}

/// List the preset questions
#[utoipa::path(
    get,
    path = "/api/v1/assistant/presets",
    tag = "assistant",
    responses(
        (status = 200, description = "Preset questions", body = PresetsResponse)
    )
)]
pub async fn list_presets() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        presets: PRESETS.iter().map(|p| p.to_string()).collect(),
    })
}
