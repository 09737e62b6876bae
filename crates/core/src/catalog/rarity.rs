//! # Rarity Tiers
//!
//! The closed set of rarity tiers the catalog uses, and the display accents
//! derived from them. Accents are presentation-only; nothing in the lookup
//! or grounding logic branches on rarity.

use serde::{Serialize, Serializer};

/// Rarity tier of a catalog entry
///
/// Names the remote service sends outside the known set land in
/// [`RarityTier::Unrecognized`] instead of failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RarityTier {
    Common,
    Rare,
    SuperRare,
    Epic,
    Mythic,
    Legendary,
    Chromatic,
    UltraLegendary,
    Unrecognized(String),
}

impl RarityTier {
    /// Every known tier, lowest weight first
    pub fn known() -> [RarityTier; 8] {
        [
            RarityTier::Common,
            RarityTier::Rare,
            RarityTier::SuperRare,
            RarityTier::Epic,
            RarityTier::Mythic,
            RarityTier::Legendary,
            RarityTier::Chromatic,
            RarityTier::UltraLegendary,
        ]
    }

    /// Parse the display name used by the catalog service
    pub fn from_name(name: &str) -> Self {
        match name {
            "Common" => Self::Common,
            "Rare" => Self::Rare,
            "Super Rare" => Self::SuperRare,
            "Epic" => Self::Epic,
            "Mythic" => Self::Mythic,
            "Legendary" => Self::Legendary,
            "Chromatic" => Self::Chromatic,
            "Ultra Legendary" => Self::UltraLegendary,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Display name, as the catalog service spells it
    pub fn name(&self) -> &str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::SuperRare => "Super Rare",
            Self::Epic => "Epic",
            Self::Mythic => "Mythic",
            Self::Legendary => "Legendary",
            Self::Chromatic => "Chromatic",
            Self::UltraLegendary => "Ultra Legendary",
            Self::Unrecognized(name) => name,
        }
    }

    /// Sort weight for display; unrecognized tiers sort first
    pub fn weight(&self) -> u8 {
        match self {
            Self::Common => 1,
            Self::Rare => 2,
            Self::SuperRare => 3,
            Self::Epic => 4,
            Self::Mythic => 5,
            Self::Legendary => 6,
            Self::Chromatic => 7,
            Self::UltraLegendary => 8,
            Self::Unrecognized(_) => 0,
        }
    }

    /// Badge and background accents for this tier
    pub fn accents(&self) -> AccentPair {
        match self {
            Self::Common => AccentPair::new("gray-500", "gray-400"),
            Self::Rare => AccentPair::new("green-500", "green-400"),
            Self::SuperRare => AccentPair::new("blue-500", "blue-400"),
            Self::Epic => AccentPair::new("purple-500", "purple-400"),
            Self::Mythic => AccentPair::new("red-500", "red-400"),
            Self::Legendary => AccentPair::new("yellow-500", "yellow-400"),
            Self::Chromatic => AccentPair::new("orange-500", "orange-400"),
            Self::UltraLegendary => AccentPair::new("lime-500", "lime-400"),
            Self::Unrecognized(_) => AccentPair::FALLBACK,
        }
    }
}

impl Default for RarityTier {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl std::fmt::Display for RarityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for RarityTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Two color tokens for rendering a selected entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccentPair {
    pub badge: &'static str,
    pub background: &'static str,
}

impl AccentPair {
    /// Used for any tier outside the known set
    pub const FALLBACK: AccentPair = AccentPair::new("gray-500", "purple-500");

    /// Backdrop when nothing is selected
    pub const NEUTRAL: AccentPair = AccentPair::new("gray-500", "purple-500");

    const fn new(badge: &'static str, background: &'static str) -> Self {
        Self { badge, background }
    }
}
