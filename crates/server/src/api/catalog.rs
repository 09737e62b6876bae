//! # Catalog API
//!
//! Endpoints for browsing the catalog: current selection, search and refresh.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use brawldex_core::catalog::{AccentPair, LookupEngine, SearchOutcome, SelectionState};
use brawldex_core::events::{AppEvent, AppEventKind};

use crate::SharedState;

/// Current browsing state
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogView {
    /// `empty`, `loading`, `unselected`, `error` or `selected`, with detail
    #[schema(value_type = Object)]
    pub selection: SelectionState,
    /// Entries in the loaded snapshot
    pub catalog_size: usize,
    #[schema(value_type = Object)]
    pub accents: AccentPair,
}

impl CatalogView {
    pub fn of(engine: &LookupEngine) -> Self {
        Self {
            selection: engine.state().clone(),
            catalog_size: engine.catalog_len(),
            accents: engine.accents(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Name fragment or exact id
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    /// `ignored`, `found` or `missed`
    pub outcome: String,
    pub catalog: CatalogView,
}

pub fn catalog_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_catalog))
        .route("/search", post(search_catalog))
        .route("/refresh", post(refresh_catalog))
}

fn outcome_label(outcome: SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Ignored => "ignored",
        SearchOutcome::Found(_) => "found",
        SearchOutcome::Missed => "missed",
    }
}

/// Get the current selection
#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Current browsing state", body = CatalogView)
    )
)]
pub async fn get_catalog(State(state): State<SharedState>) -> Json<CatalogView> {
    let engine = state.app.lookup.read().await;
    Json(CatalogView::of(&engine))
}

/// Search the loaded catalog by name fragment or id
#[utoipa::path(
    post,
    path = "/api/v1/catalog/search",
    tag = "catalog",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Search applied", body = SearchResponse)
    )
)]
pub async fn search_catalog(
    State(state): State<SharedState>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let (outcome, view) = {
        let mut engine = state.app.lookup.write().await;
        let outcome = engine.search(&req.query);
        (outcome, CatalogView::of(&engine))
    };

    match outcome {
        SearchOutcome::Found(_) => {
            state.publish(AppEvent::new(AppEventKind::SelectionChanged).with_data(&view))
        }
        SearchOutcome::Missed => {
            state.publish(AppEvent::new(AppEventKind::LookupMissed).with_data(&view))
        }
        SearchOutcome::Ignored => {}
    }

    Json(SearchResponse {
        outcome: outcome_label(outcome).to_string(),
        catalog: view,
    })
}

/// Refetch the catalog and reselect its first entry
#[utoipa::path(
    post,
    path = "/api/v1/catalog/refresh",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog reloaded", body = CatalogView)
    )
)]
pub async fn refresh_catalog(State(state): State<SharedState>) -> Json<CatalogView> {
    state.publish(AppEvent::new(AppEventKind::CatalogLoading));
    state.app.refresh_catalog().await;

    let view = CatalogView::of(&*state.app.lookup.read().await);
    state.publish(AppEvent::new(AppEventKind::CatalogLoaded).with_data(&view));
    Json(view)
}
