//! # Catalog
//!
//! Fetching, caching and browsing the remote entity catalog.
//!
//! ## Modules
//!
//! - `model` - Entries, sub-abilities and the immutable snapshot
//! - `rarity` - Closed rarity set and its display accents
//! - `source` - Network fetch of the catalog listing
//! - `cache` - Shared lazily-loaded snapshot
//! - `lookup` - Selection state machine and search

pub mod cache;
pub mod lookup;
pub mod model;
pub mod rarity;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::CatalogCache;
pub use lookup::{find_entry, LookupEngine, SearchOutcome, SelectionState};
pub use model::{CatalogEntry, CatalogSnapshot, SubAbility};
pub use rarity::{AccentPair, RarityTier};
pub use source::{CatalogSource, HttpCatalogSource, DEFAULT_CATALOG_URL};
