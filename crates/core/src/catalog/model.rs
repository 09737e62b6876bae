//! # Catalog Model
//!
//! Catalog entries and the immutable snapshot they are delivered in, plus
//! decoding from the catalog service's JSON payload.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::rarity::RarityTier;
use crate::error::CatalogError;

/// A star power or gadget attached to an entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAbility {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One game entity from the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Stable id assigned by the catalog service
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Class label (e.g. "Tank"); absent for some entries
    pub category: Option<String>,
    pub rarity: RarityTier,
    /// Hex color the service attaches to the rarity
    pub rarity_color: Option<String>,
    pub image_url: Option<String>,
    pub star_powers: Vec<SubAbility>,
    pub gadgets: Vec<SubAbility>,
}

impl CatalogEntry {
    /// Star powers followed by gadgets
    pub fn sub_abilities(&self) -> impl Iterator<Item = &SubAbility> {
        self.star_powers.iter().chain(self.gadgets.iter())
    }
}

/// Ordered result of one catalog fetch
///
/// Ids are unique within a snapshot. Snapshots are never patched; a refetch
/// produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    entries: Vec<CatalogEntry>,
}

impl CatalogSnapshot {
    /// Build a snapshot, rejecting duplicate ids
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(CatalogError::DuplicateId(entry.id));
            }
        }
        Ok(Self { entries })
    }

    /// Decode the catalog service's `{"list": [...]}` payload
    pub fn from_json(body: &[u8]) -> Result<Self, CatalogError> {
        let payload: CatalogPayload = serde_json::from_slice(body)?;
        let mut entries = Vec::with_capacity(payload.list.len());
        for raw in payload.list {
            let named = raw.name.as_deref().is_some_and(|name| !name.trim().is_empty());
            if !named {
                tracing::warn!(id = raw.id, "Skipping catalog entry without a name");
                continue;
            }
            entries.push(CatalogEntry::from(raw));
        }
        Self::new(entries)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&CatalogEntry> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }
}

// === Wire format ===

#[derive(Deserialize)]
struct CatalogPayload {
    #[serde(default)]
    list: Vec<RawEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "imageUrl2")]
    image_url: Option<String>,
    #[serde(default)]
    class: Option<RawNamed>,
    #[serde(default)]
    rarity: Option<RawRarity>,
    #[serde(default)]
    star_powers: Option<Vec<RawAbility>>,
    #[serde(default)]
    gadgets: Option<Vec<RawAbility>>,
}

#[derive(Deserialize)]
struct RawNamed {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct RawRarity {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAbility {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

impl From<RawAbility> for SubAbility {
    fn from(raw: RawAbility) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            image_url: raw.image_url,
        }
    }
}

impl From<RawEntry> for CatalogEntry {
    fn from(raw: RawEntry) -> Self {
        let (rarity, rarity_color) = match raw.rarity {
            Some(r) => (
                RarityTier::from_name(r.name.as_deref().unwrap_or_default()),
                r.color,
            ),
            None => (RarityTier::default(), None),
        };
        let category = raw
            .class
            .and_then(|c| c.name)
            .filter(|name| !name.trim().is_empty());

        Self {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            category,
            rarity,
            rarity_color,
            image_url: raw.image_url,
            star_powers: abilities(raw.star_powers),
            gadgets: abilities(raw.gadgets),
        }
    }
}

fn abilities(raw: Option<Vec<RawAbility>>) -> Vec<SubAbility> {
    raw.unwrap_or_default()
        .into_iter()
        .map(SubAbility::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r##"{
        "list": [
            {
                "id": 16000000,
                "name": "Shelly",
                "description": "Shelly's spread-fire shotgun blasts the other team with buckshot.",
                "imageUrl2": "https://cdn.example/shelly.png",
                "class": {"id": 1, "name": "Damage Dealer"},
                "rarity": {"id": 1, "name": "Common", "color": "#b9eaff"},
                "starPowers": [
                    {"id": 23000076, "name": "Shell Shock", "description": "Slows enemies.", "imageUrl": "https://cdn.example/ss.png"}
                ],
                "gadgets": [
                    {"id": 23000255, "name": "Fast Forward", "description": "Dashes ahead."}
                ]
            },
            {
                "id": 16000001,
                "name": "Colt",
                "class": null,
                "rarity": {"name": "Starting Brawler"}
            }
        ]
    }"##;

    #[test]
    fn test_decode_full_entry() {
        let snapshot = CatalogSnapshot::from_json(PAYLOAD.as_bytes()).unwrap();
        assert_eq!(snapshot.len(), 2);

        let shelly = &snapshot.entries()[0];
        assert_eq!(shelly.id, 16000000);
        assert_eq!(shelly.category.as_deref(), Some("Damage Dealer"));
        assert_eq!(shelly.rarity, RarityTier::Common);
        assert_eq!(shelly.rarity_color.as_deref(), Some("#b9eaff"));
        assert_eq!(shelly.image_url.as_deref(), Some("https://cdn.example/shelly.png"));
        assert_eq!(shelly.star_powers[0].name, "Shell Shock");
        assert_eq!(shelly.gadgets[0].image_url, None);
        assert_eq!(shelly.sub_abilities().count(), 2);
    }

    #[test]
    fn test_decode_defaults_missing_fields() {
        let snapshot = CatalogSnapshot::from_json(PAYLOAD.as_bytes()).unwrap();
        let colt = &snapshot.entries()[1];
        assert_eq!(colt.description, "");
        assert_eq!(colt.category, None);
        assert!(colt.star_powers.is_empty());
        assert!(colt.gadgets.is_empty());
        assert!(matches!(colt.rarity, RarityTier::Unrecognized(_)));
    }

    #[test]
    fn test_missing_list_is_empty_snapshot() {
        let snapshot = CatalogSnapshot::from_json(b"{}").unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.first().is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let body = r#"{"list": [{"id": 1, "name": "A"}, {"id": 1, "name": "B"}]}"#;
        let err = CatalogSnapshot::from_json(body.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(1)));
    }

    #[test]
    fn test_nameless_entries_skipped() {
        let body = r#"{"list": [
            {"id": 1, "name": "  "},
            {"id": 2, "name": "Bull"},
            {"id": 3, "name": null},
            {"id": 4}
        ]}"#;
        let snapshot = CatalogSnapshot::from_json(body.as_bytes()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.entries()[0].name, "Bull");
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        let err = CatalogSnapshot::from_json(b"<html>").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }
}
