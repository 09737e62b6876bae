//! # Lookup Engine
//!
//! Selection state machine over the loaded catalog snapshot. The engine is
//! synchronous; [`load`] and [`refresh`] drive it across the network
//! boundary without holding its lock while the fetch is outstanding.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::cache::CatalogCache;
use super::model::{CatalogEntry, CatalogSnapshot};
use super::rarity::AccentPair;
use crate::error::CatalogError;

/// Shown when the catalog could not be loaded
pub const CONNECTION_FAILED: &str = "connection failed";

/// Shown when a search matches nothing
pub const NOT_FOUND: &str = "entity not found — try a different name or id";

/// What the browsing view currently shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum SelectionState {
    /// No catalog requested yet
    #[default]
    Empty,
    Loading,
    /// Catalog loaded but contains no entries
    Unselected,
    Error(String),
    Selected(CatalogEntry),
}

/// Result of one search attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; nothing changed
    Ignored,
    /// Entry with this id is now selected
    Found(i64),
    Missed,
}

/// First entry in snapshot order matching `query`
///
/// An entry matches when its lowercased name contains the trimmed,
/// lowercased query, or when its id prints exactly as the trimmed query.
pub fn find_entry<'a>(snapshot: &'a CatalogSnapshot, query: &str) -> Option<&'a CatalogEntry> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    let needle = trimmed.to_lowercase();

    snapshot.iter().find(|entry| {
        entry.name.to_lowercase().contains(&needle) || entry.id.to_string() == trimmed
    })
}

/// Catalog browsing state: snapshot, selection and pending search input
#[derive(Debug, Default)]
pub struct LookupEngine {
    snapshot: Option<Arc<CatalogSnapshot>>,
    state: SelectionState,
    input: String,
    /// Bumped by every `begin_load`; older loads may not land
    load_generation: u64,
}

impl LookupEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&CatalogEntry> {
        match &self.state {
            SelectionState::Selected(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&Arc<CatalogSnapshot>> {
        self.snapshot.as_ref()
    }

    /// Number of entries in the loaded snapshot (0 when none is loaded)
    pub fn catalog_len(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.len())
    }

    /// Accents for the current view
    pub fn accents(&self) -> AccentPair {
        self.selected()
            .map_or(AccentPair::NEUTRAL, |entry| entry.rarity.accents())
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Enter `Loading` ahead of a fetch, returning the load's generation
    pub fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.state = SelectionState::Loading;
        self.load_generation
    }

    /// Apply a fetch outcome only if no later load has begun since
    /// `generation` was issued. Returns whether it was applied.
    pub fn finish_load_for(
        &mut self,
        generation: u64,
        result: Result<Arc<CatalogSnapshot>, CatalogError>,
    ) -> bool {
        if generation != self.load_generation {
            tracing::debug!(
                generation,
                current = self.load_generation,
                "Discarding superseded catalog load"
            );
            return false;
        }
        self.finish_load(result);
        true
    }

    /// Apply the outcome of a catalog fetch
    ///
    /// A non-empty snapshot selects its first entry; an empty one leaves
    /// the engine `Unselected`. A failure drops any held snapshot.
    pub fn finish_load(&mut self, result: Result<Arc<CatalogSnapshot>, CatalogError>) {
        match result {
            Ok(snapshot) => {
                self.state = match snapshot.first() {
                    Some(first) => SelectionState::Selected(first.clone()),
                    None => SelectionState::Unselected,
                };
                tracing::debug!(entries = snapshot.len(), "Lookup engine loaded catalog");
                self.snapshot = Some(snapshot);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog load failed");
                self.snapshot = None;
                self.state = SelectionState::Error(CONNECTION_FAILED.to_string());
            }
        }
    }

    /// Search with the stored input
    pub fn submit(&mut self) -> SearchOutcome {
        let query = std::mem::take(&mut self.input);
        let outcome = self.search(&query);
        if outcome == SearchOutcome::Ignored {
            self.input = query;
        }
        outcome
    }

    /// Select the first entry matching `query`
    ///
    /// Blank queries are ignored. Otherwise the input is cleared and the
    /// state becomes either the match or the not-found error. Without a
    /// loaded snapshot every query misses.
    pub fn search(&mut self, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::Ignored;
        }
        self.input.clear();

        let found = self
            .snapshot
            .as_deref()
            .and_then(|snapshot| find_entry(snapshot, query));

        match found {
            Some(entry) => {
                let id = entry.id;
                self.state = SelectionState::Selected(entry.clone());
                SearchOutcome::Found(id)
            }
            None => {
                tracing::debug!(query = %query.trim(), "Lookup missed");
                self.state = SelectionState::Error(NOT_FOUND.to_string());
                SearchOutcome::Missed
            }
        }
    }
}

/// Load the catalog into `engine` through the shared cache
///
/// When loads overlap, the one begun last decides the final state.
pub async fn load(engine: &RwLock<LookupEngine>, cache: &CatalogCache) {
    let generation = engine.write().await.begin_load();
    let result = cache.get().await;
    engine.write().await.finish_load_for(generation, result);
}

/// Refetch the catalog and reload `engine` from the new snapshot
pub async fn refresh(engine: &RwLock<LookupEngine>, cache: &CatalogCache) {
    let generation = engine.write().await.begin_load();
    let result = cache.refresh().await;
    engine.write().await.finish_load_for(generation, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::rarity::RarityTier;
    use crate::catalog::testing::{entry, sample_snapshot, StubSource};

    fn loaded() -> LookupEngine {
        let mut engine = LookupEngine::new();
        engine.begin_load();
        engine.finish_load(Ok(Arc::new(sample_snapshot())));
        engine
    }

    fn selected_name(engine: &LookupEngine) -> Option<&str> {
        engine.selected().map(|e| e.name.as_str())
    }

    #[test]
    fn test_load_selects_first_entry() {
        let engine = loaded();
        assert_eq!(selected_name(&engine), Some("Shelly"));
        assert_eq!(engine.catalog_len(), 2);
    }

    #[test]
    fn test_empty_catalog_is_unselected() {
        let mut engine = LookupEngine::new();
        engine.begin_load();
        assert_eq!(engine.state(), &SelectionState::Loading);

        engine.finish_load(Ok(Arc::new(CatalogSnapshot::default())));
        assert_eq!(engine.state(), &SelectionState::Unselected);
        assert_eq!(engine.accents(), AccentPair::NEUTRAL);
    }

    #[test]
    fn test_failed_load_drops_snapshot() {
        let mut engine = loaded();
        engine.begin_load();
        engine.finish_load(Err(CatalogError::Status(500)));

        assert_eq!(
            engine.state(),
            &SelectionState::Error(CONNECTION_FAILED.to_string())
        );
        assert!(engine.snapshot().is_none());
        assert_eq!(engine.catalog_len(), 0);
    }

    #[test]
    fn test_superseded_load_is_discarded() {
        let mut engine = LookupEngine::new();
        let initial = engine.begin_load();
        let refreshing = engine.begin_load();

        assert!(engine.finish_load_for(refreshing, Err(CatalogError::Status(503))));
        assert!(!engine.finish_load_for(initial, Ok(Arc::new(sample_snapshot()))));

        assert_eq!(
            engine.state(),
            &SelectionState::Error(CONNECTION_FAILED.to_string())
        );
        assert!(engine.snapshot().is_none());
    }

    #[test]
    fn test_search_by_id() {
        let mut engine = loaded();
        assert_eq!(engine.search("16"), SearchOutcome::Found(16));
        assert_eq!(selected_name(&engine), Some("Spike"));
    }

    #[test]
    fn test_search_by_name_fragment() {
        let mut engine = loaded();
        engine.search("16");
        assert_eq!(engine.search("she"), SearchOutcome::Found(1));
        assert_eq!(selected_name(&engine), Some("Shelly"));

        assert_eq!(engine.search("  SPI "), SearchOutcome::Found(16));
    }

    #[test]
    fn test_miss_replaces_selection_with_error() {
        let mut engine = loaded();
        assert_eq!(engine.search("zzz"), SearchOutcome::Missed);
        assert_eq!(engine.state(), &SelectionState::Error(NOT_FOUND.to_string()));
        assert!(engine.selected().is_none());
    }

    #[test]
    fn test_match_clears_previous_error() {
        let mut engine = loaded();
        engine.search("zzz");
        engine.search("spike");
        assert_eq!(selected_name(&engine), Some("Spike"));
    }

    #[test]
    fn test_blank_search_is_noop() {
        let mut engine = loaded();
        engine.search("spike");
        engine.set_input("   ");

        assert_eq!(engine.search(""), SearchOutcome::Ignored);
        assert_eq!(engine.search("   "), SearchOutcome::Ignored);
        assert_eq!(engine.submit(), SearchOutcome::Ignored);

        assert_eq!(selected_name(&engine), Some("Spike"));
        assert_eq!(engine.input(), "   ");
    }

    #[test]
    fn test_submit_clears_input_on_match_and_miss() {
        let mut engine = loaded();
        engine.set_input("spike");
        assert_eq!(engine.submit(), SearchOutcome::Found(16));
        assert_eq!(engine.input(), "");

        engine.set_input("nobody");
        assert_eq!(engine.submit(), SearchOutcome::Missed);
        assert_eq!(engine.input(), "");
    }

    #[test]
    fn test_search_before_load_misses() {
        let mut engine = LookupEngine::new();
        assert_eq!(engine.search("shelly"), SearchOutcome::Missed);
        assert_eq!(engine.state(), &SelectionState::Error(NOT_FOUND.to_string()));
    }

    #[test]
    fn test_first_match_wins_on_name_collision() {
        let snapshot = CatalogSnapshot::new(vec![
            entry(7, "Bo", None),
            entry(8, "Bo", None),
            entry(9, "Bonnie", None),
        ])
        .unwrap();
        assert_eq!(find_entry(&snapshot, "bo").map(|e| e.id), Some(7));
    }

    #[test]
    fn test_id_match_is_exact() {
        let snapshot = sample_snapshot();
        assert!(find_entry(&snapshot, "6").is_none());
        assert_eq!(find_entry(&snapshot, " 1 ").map(|e| e.id), Some(1));
    }

    #[test]
    fn test_accents_follow_selection() {
        let mut legendary = entry(3, "Leon", Some("Assassin"));
        legendary.rarity = RarityTier::Legendary;
        let mut engine = LookupEngine::new();
        engine.finish_load(Ok(Arc::new(CatalogSnapshot::new(vec![legendary]).unwrap())));

        assert_eq!(engine.accents(), RarityTier::Legendary.accents());
        engine.search("zzz");
        assert_eq!(engine.accents(), AccentPair::NEUTRAL);
    }

    #[tokio::test]
    async fn test_load_through_cache() {
        let cache = CatalogCache::new(Arc::new(StubSource::ok(sample_snapshot())));
        let engine = RwLock::new(LookupEngine::new());

        load(&engine, &cache).await;
        assert_eq!(selected_name(&*engine.read().await), Some("Shelly"));
        assert!(cache.peek().await.is_some());
    }

    #[tokio::test]
    async fn test_refresh_reselects_first() {
        let source = Arc::new(StubSource::ok(sample_snapshot()));
        let cache = CatalogCache::new(source.clone());
        let engine = RwLock::new(LookupEngine::new());

        load(&engine, &cache).await;
        engine.write().await.search("spike");
        refresh(&engine, &cache).await;

        assert_eq!(selected_name(&*engine.read().await), Some("Shelly"));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_load_failure_through_cache() {
        let cache = CatalogCache::new(Arc::new(StubSource::failing(502)));
        let engine = RwLock::new(LookupEngine::new());

        load(&engine, &cache).await;
        assert_eq!(
            engine.read().await.state(),
            &SelectionState::Error(CONNECTION_FAILED.to_string())
        );
    }
}
