//! Brawldex Server
//!
//! Local JSON API over the catalog lookup engine and the grounded
//! assistant, with an SSE stream of state changes, plus one-shot CLI
//! commands for scripting.

mod api;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse,
    },
    routing::get,
    Router,
};
use brawldex_core::assistant::PRESETS;
use brawldex_core::events::{AppEvent, AppEventKind};
use brawldex_core::{Brawldex, BrawldexConfig};
use clap::{Parser, Subcommand};
use futures::stream::{self, Stream};
use std::{convert::Infallible, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::broadcast};
use utoipa::OpenApi;

use api::catalog::CatalogView;

/// Application state
pub struct AppState {
    pub app: Brawldex,
    event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    /// Publish to SSE subscribers; dropped when nobody is listening
    pub fn publish(&self, event: AppEvent) {
        let _ = self.event_tx.send(event);
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Parser, Clone)]
#[command(author, version, about = "Brawldex - brawler catalog and grounded assistant")]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the local API server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Look up one brawler by name fragment or id and print it
    Lookup {
        /// Name fragment or exact id
        query: String,
    },
    /// Ask the assistant a question and print the answer
    Ask {
        /// The question to ask
        question: Option<String>,
        /// Ask a preset question instead (see `presets`)
        #[arg(short, long, conflicts_with = "question")]
        preset: Option<usize>,
    },
    /// List the preset questions
    Presets,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Brawldex API",
        version = "1.0.0",
        description = "Brawler catalog lookup and grounded question assistant"
    ),
    paths(
        api::catalog::get_catalog,
        api::catalog::search_catalog,
        api::catalog::refresh_catalog,
        api::assistant::get_exchange,
        api::assistant::ask,
        api::assistant::clear,
        api::assistant::list_presets
    ),
    components(
        schemas(
            api::catalog::CatalogView,
            api::catalog::SearchRequest,
            api::catalog::SearchResponse,
            api::assistant::ExchangeView,
            api::assistant::AskRequest,
            api::assistant::AskResponse,
            api::assistant::PresetsResponse
        )
    ),
    tags(
        (name = "catalog", description = "Catalog browsing"),
        (name = "assistant", description = "Grounded question assistant")
    )
)]
struct ApiDoc;

/// SSE endpoint for state changes with heartbeat
async fn events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        let timeout = tokio::time::timeout(std::time::Duration::from_secs(15), rx.recv()).await;

        match timeout {
            Ok(Ok(event)) => {
                let json = serde_json::to_string(&event).unwrap_or_default();
                Some((Ok(Event::default().data(json)), rx))
            }
            Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                tracing::debug!(skipped, "SSE subscriber lagged");
                Some((Ok(Event::default().comment("lagged")), rx))
            }
            Ok(Err(broadcast::error::RecvError::Closed)) => None,
            // Timeout - send heartbeat comment
            Err(_) => Some((Ok(Event::default().comment("heartbeat")), rx)),
        }
    });

    Sse::new(stream)
}

async fn serve_openapi() -> impl IntoResponse {
    match ApiDoc::openapi().to_json() {
        Ok(spec) => ([(header::CONTENT_TYPE, "application/json")], spec).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render OpenAPI document");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn run_server(app: Brawldex, port: u16) -> anyhow::Result<()> {
    let (event_tx, _) = broadcast::channel::<AppEvent>(100);
    let state: SharedState = Arc::new(AppState { app, event_tx });

    // Initial load runs in the background so the API is reachable while it is outstanding
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            state.publish(AppEvent::new(AppEventKind::CatalogLoading));
            state.app.start().await;
            let view = CatalogView::of(&*state.app.lookup.read().await);
            state.publish(AppEvent::new(AppEventKind::CatalogLoaded).with_data(&view));
        });
    }

    // Surface in-flight questions to SSE watchers
    {
        let state = Arc::clone(&state);
        let mut updates = state.app.assistant.subscribe();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let exchange = updates.borrow_and_update().clone();
                if exchange.is_pending() {
                    let event = AppEvent::new(AppEventKind::QuestionPending).with_data(&exchange);
                    state.publish(event);
                }
            }
        });
    }

    let router = Router::new()
        .nest("/api/v1/catalog", api::catalog_routes())
        .nest("/api/v1/assistant", api::assistant_routes())
        .route("/api/v1/events", get(events))
        .route("/api/v1/openapi.json", get(serve_openapi))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!(%addr, "Brawldex server listening");
    println!("🚀 Brawldex running at http://{}", addr);
    println!("   Catalog:   /api/v1/catalog, /search, /refresh");
    println!("   Assistant: /api/v1/assistant, /ask, /clear, /presets");
    println!("   Events:    /api/v1/events (SSE)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn run_lookup(app: Brawldex, query: &str) -> anyhow::Result<()> {
    app.start().await;
    let mut engine = app.lookup.write().await;
    engine.search(query);
    println!("{}", serde_json::to_string_pretty(&CatalogView::of(&engine))?);
    Ok(())
}

async fn run_ask(
    app: Brawldex,
    question: Option<String>,
    preset: Option<usize>,
) -> anyhow::Result<()> {
    app.assistant.warm().await;

    let outcome = match (preset, question) {
        (Some(index), _) => {
            if index >= PRESETS.len() {
                anyhow::bail!("No preset {} (there are {})", index, PRESETS.len());
            }
            app.assistant.ask_preset(index).await
        }
        (None, Some(question)) => app.assistant.ask(&question).await,
        (None, None) => anyhow::bail!("Provide a question or --preset"),
    };

    let exchange = app.assistant.exchange().await;
    tracing::debug!(outcome = api::assistant::outcome_label(outcome), "Ask finished");
    if exchange.question_text.is_empty() {
        anyhow::bail!("Question was empty");
    }
    println!("Q: {}\n", exchange.question_text);
    println!("{}", exchange.answer_text);
    Ok(())
}

fn load_app() -> anyhow::Result<Brawldex> {
    Brawldex::from_config(BrawldexConfig::load())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match args.command.unwrap_or(CliCommand::Serve { port: 8080 }) {
        CliCommand::Presets => {
            for (i, preset) in PRESETS.iter().enumerate() {
                println!("{}: {}", i, preset);
            }
            Ok(())
        }
        CliCommand::Lookup { query } => run_lookup(load_app()?, &query).await,
        CliCommand::Ask { question, preset } => run_ask(load_app()?, question, preset).await,
        CliCommand::Serve { port } => run_server(load_app()?, port).await,
    }
}
