//! # Brawldex Core
//!
//! Catalog browsing and a grounded question assistant for the Brawl Stars
//! brawler catalog.
//!
//! ## Architecture
//!
//! - `catalog/` - Catalog model, fetch, shared cache and the lookup engine
//! - `assistant/` - Grounding, prompt composition and the question exchange
//! - `config` - Environment-driven settings
//! - `events` - State-change notifications
//! - `app` - Wiring of both subsystems over one catalog cache
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brawldex_core::{Brawldex, BrawldexConfig};
//!
//! let app = Brawldex::from_config(BrawldexConfig::load())?;
//! app.start().await;
//! app.lookup.write().await.search("spike");
//! app.assistant.ask("Who is good in Brawl Ball?").await;
//! ```

pub mod app;
pub mod assistant;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;

pub use app::Brawldex;
pub use config::BrawldexConfig;
pub use error::{CatalogError, QueryError};
