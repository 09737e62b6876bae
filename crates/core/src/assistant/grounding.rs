//! # Grounding
//!
//! Turns the catalog snapshot into the context line embedded in every
//! prompt. Entries are taken in snapshot order, first-N; an entry that
//! would push the text past the character cap ends assembly, so the
//! context never holds a partial entry.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, CatalogSnapshot};

pub const ENTRY_SEPARATOR: &str = ", ";
pub const CATEGORY_PLACEHOLDER: &str = "N/A";

/// Bounds on the grounding context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingPolicy {
    /// Maximum number of entries included
    pub max_entries: usize,
    /// Maximum length of the context, in characters
    pub max_chars: usize,
}

impl Default for GroundingPolicy {
    fn default() -> Self {
        Self {
            max_entries: 500,
            max_chars: 16_000,
        }
    }
}

/// Assembled grounding text plus how much of the catalog it covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingContext {
    pub text: String,
    pub included: usize,
    pub total: usize,
}

impl GroundingContext {
    pub fn is_truncated(&self) -> bool {
        self.included < self.total
    }
}

/// `"<name> (Category: <category>)"`
pub fn entry_line(entry: &CatalogEntry) -> String {
    format!(
        "{} (Category: {})",
        entry.name,
        entry.category.as_deref().unwrap_or(CATEGORY_PLACEHOLDER)
    )
}

/// Build the grounding context; no snapshot yields an empty context
pub fn build_context(
    snapshot: Option<&CatalogSnapshot>,
    policy: &GroundingPolicy,
) -> GroundingContext {
    let Some(snapshot) = snapshot else {
        return GroundingContext::default();
    };

    let separator_chars = ENTRY_SEPARATOR.chars().count();
    let mut text = String::new();
    let mut chars = 0;
    let mut included = 0;

    for entry in snapshot.iter().take(policy.max_entries) {
        let line = entry_line(entry);
        let extra = if included == 0 { 0 } else { separator_chars };
        let line_chars = line.chars().count();
        if chars + extra + line_chars > policy.max_chars {
            break;
        }
        if included > 0 {
            text.push_str(ENTRY_SEPARATOR);
        }
        text.push_str(&line);
        chars += extra + line_chars;
        included += 1;
    }

    let context = GroundingContext {
        text,
        included,
        total: snapshot.len(),
    };
    if context.is_truncated() {
        tracing::debug!(
            included = context.included,
            total = context.total,
            "Grounding context truncated"
        );
    }
    context
}
