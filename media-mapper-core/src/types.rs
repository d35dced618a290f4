//! Data model for the company → media mapping.
//!
//! The mapping is an explicit three-level structure (company → kind → item
//! id) with no auto-vivification: a company level only exists once it has
//! been inserted with [`Cache::insert_company`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// ── MediaKind ───────────────────────────────────────────────────────────────

/// Which discovery endpoint an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// All kinds, in the order they are fetched and written.
    pub const ALL: [MediaKind; 2] = [MediaKind::Movie, MediaKind::Tv];

    /// Text form used in URLs and in the mapping file's `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = CatalogError;

    /// Parse the exact text form (`movie` or `tv`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            other => Err(CatalogError::invalid_argument(format!(
                "invalid media kind \"{other}\""
            ))),
        }
    }
}

// ── MediaItem ───────────────────────────────────────────────────────────────

/// One discovered movie or show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Remote catalog id, unique within a (company, kind) pair.
    pub id: String,
    pub kind: MediaKind,
    pub title: String,
    /// Four-digit release year, or empty when unknown.
    pub year: String,
    /// Relative poster path, when the catalog has one.
    pub poster: Option<String>,
    /// Popularity score kept in its text form.
    pub popularity: String,
}

// ── CompanyMedia ────────────────────────────────────────────────────────────

/// All items known for a single company, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyMedia {
    // Ids compare as strings ("10" sorts before "9") so saved files are
    // stable across runs regardless of API result order.
    by_kind: BTreeMap<MediaKind, BTreeMap<String, MediaItem>>,
}

impl CompanyMedia {
    /// Insert or replace the item keyed by `(item.kind, item.id)`.
    ///
    /// Returns the previous item for that key, if any.
    pub fn upsert(&mut self, item: MediaItem) -> Option<MediaItem> {
        self.by_kind
            .entry(item.kind)
            .or_default()
            .insert(item.id.clone(), item)
    }

    pub fn get(&self, kind: MediaKind, id: &str) -> Option<&MediaItem> {
        self.by_kind.get(&kind).and_then(|items| items.get(id))
    }

    /// All items: movies first, then tv, each ordered by id.
    pub fn items(&self) -> impl Iterator<Item = &MediaItem> {
        self.by_kind.values().flat_map(|items| items.values())
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Cache ───────────────────────────────────────────────────────────────────

/// In-memory working set: company id → [`CompanyMedia`].
///
/// Companies iterate in the order they were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cache {
    order: Vec<String>,
    companies: HashMap<String, CompanyMedia>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the media for a company, inserting an empty entry if it is new.
    pub fn insert_company(&mut self, company_id: &str) -> &mut CompanyMedia {
        if !self.companies.contains_key(company_id) {
            self.order.push(company_id.to_string());
        }
        self.companies.entry(company_id.to_string()).or_default()
    }

    pub fn company(&self, company_id: &str) -> Option<&CompanyMedia> {
        self.companies.get(company_id)
    }

    pub fn contains(&self, company_id: &str) -> bool {
        self.companies.contains_key(company_id)
    }

    /// Companies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompanyMedia)> {
        self.order.iter().filter_map(|id| {
            self.companies
                .get(id)
                .map(|media| (id.as_str(), media))
        })
    }

    /// Number of companies.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of items across all companies.
    pub fn item_count(&self) -> usize {
        self.companies.values().map(CompanyMedia::len).sum()
    }
}

// ── CompanyNames ────────────────────────────────────────────────────────────

/// Display names recorded per company id.
///
/// Presence of an id here means the company has already been checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyNames {
    names: HashMap<String, String>,
}

impl CompanyNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name for a company. A blank name never replaces an existing one.
    ///
    /// Returns false when the existing name was kept.
    pub fn record(&mut self, company_id: &str, name: &str) -> bool {
        if name.trim().is_empty() && self.names.contains_key(company_id) {
            return false;
        }
        self.names.insert(company_id.to_string(), name.to_string());
        true
    }

    /// Record a name only if it is non-blank and the company has none yet.
    pub fn record_first(&mut self, company_id: &str, name: &str) -> bool {
        if name.trim().is_empty() || self.names.contains_key(company_id) {
            return false;
        }
        self.names.insert(company_id.to_string(), name.to_string());
        true
    }

    pub fn get(&self, company_id: &str) -> Option<&str> {
        self.names.get(company_id).map(String::as_str)
    }

    pub fn contains(&self, company_id: &str) -> bool {
        self.names.contains_key(company_id)
    }

    /// Company ids in ascending order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.names.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
