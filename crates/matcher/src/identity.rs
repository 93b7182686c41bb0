//! Bidirectional food id ↔ display name table.
//!
//! Loaded once through the same provider chain as the vocabulary. Whatever the
//! chain yields, `egg`/`eggs` always resolve to [`EGG_FOOD_ID`] so callers have
//! one identity that is guaranteed to be answerable.

use std::collections::{BTreeMap, HashMap};

use canonical::normalize;
use tracing::info;

use crate::error::SourceError;
use crate::source::{load_first, InlineProvider, ResourceProvider, SourceOrigin};

/// Id hardwired to `egg` and `eggs`.
pub const EGG_FOOD_ID: &str = "01123";
const EGG_DISPLAY_NAME: &str = "Egg";

const PACKAGED_IDENTITY: &str = include_str!("../data/identity.json");

/// Last-resort table when no provider parses.
pub const EMBEDDED_IDENTITY: &[(&str, &str)] = &[
    ("01077", "Milk"),
    ("01123", "Egg"),
    ("01145", "Butter"),
    ("02047", "Salt"),
    ("05062", "Chicken Breast"),
    ("09003", "Apple"),
    ("09040", "Banana"),
    ("11124", "Carrot"),
    ("11215", "Garlic"),
    ("11282", "Onion"),
    ("11352", "Potato"),
    ("11529", "Tomato"),
    ("19335", "Sugar"),
    ("20044", "White Rice"),
    ("20081", "Flour"),
];

#[derive(Debug, Clone)]
struct IdentityEntry {
    id: String,
    name: String,
    lowered: String,
}

/// Immutable id ↔ name lookup.
#[derive(Debug, Clone)]
pub struct IngredientIdentityMap {
    /// Sorted by id; substring scans walk this order.
    entries: Vec<IdentityEntry>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    origin: SourceOrigin,
}

impl IngredientIdentityMap {
    /// Build from `(id, display name)` pairs. Blank ids or names are skipped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(id, name)| (id.into(), name.into()))
            .collect();
        Self::build(table, SourceOrigin::Inline)
    }

    /// Load from `providers` in order, falling back to [`EMBEDDED_IDENTITY`].
    pub fn load(providers: &[Box<dyn ResourceProvider>]) -> Self {
        let map = match load_first("identity", providers, parse_identity) {
            Some((table, origin)) => Self::build(table, origin),
            None => Self::embedded(),
        };
        info!(entries = map.len(), origin = %map.origin, "identity_map_loaded");
        map
    }

    /// Load `providers` first, then the packaged table, then the embedded literal.
    pub fn load_with_defaults(mut providers: Vec<Box<dyn ResourceProvider>>) -> Self {
        providers.push(Box::new(Self::packaged_provider()));
        Self::load(&providers)
    }

    pub fn with_defaults() -> Self {
        Self::load_with_defaults(Vec::new())
    }

    pub fn packaged_provider() -> InlineProvider {
        InlineProvider::new("packaged:identity.json", PACKAGED_IDENTITY)
    }

    pub fn embedded() -> Self {
        let table = EMBEDDED_IDENTITY
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        Self::build(table, SourceOrigin::Embedded)
    }

    fn build(table: BTreeMap<String, String>, origin: SourceOrigin) -> Self {
        let entries: Vec<IdentityEntry> = table
            .into_iter()
            .map(|(id, name)| (id.trim().to_string(), name.trim().to_string()))
            .filter(|(id, name)| !id.is_empty() && !name.is_empty())
            .map(|(id, name)| IdentityEntry {
                lowered: normalize(&name).into_string(),
                id,
                name,
            })
            .collect();

        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            by_id.insert(entry.id.clone(), pos);
            // Lowest id wins when two ids share a display name.
            by_name.entry(entry.lowered.clone()).or_insert(pos);
        }

        Self {
            entries,
            by_id,
            by_name,
            origin,
        }
    }

    /// Display name for `id`.
    pub fn get_food_name(&self, id: &str) -> Option<&str> {
        let id = id.trim();
        match self.by_id.get(id) {
            Some(&pos) => Some(self.entries[pos].name.as_str()),
            None if id == EGG_FOOD_ID => Some(EGG_DISPLAY_NAME),
            None => None,
        }
    }

    /// Id for `name`: egg special case, case-insensitive exact name, then the
    /// first entry (in id order) whose name contains `name`.
    pub fn get_food_id(&self, name: &str) -> Option<&str> {
        let query = normalize(name);
        if query.is_empty() {
            return None;
        }
        if query.as_str() == "egg" || query.as_str() == "eggs" {
            return Some(EGG_FOOD_ID);
        }
        if let Some(&pos) = self.by_name.get(query.as_str()) {
            return Some(self.entries[pos].id.as_str());
        }
        self.entries
            .iter()
            .find(|entry| entry.lowered.contains(query.as_str()))
            .map(|entry| entry.id.as_str())
    }

    /// Display names containing `substring`, case-insensitive, sorted and unique.
    pub fn get_similar_names(&self, substring: &str) -> Vec<&str> {
        let query = normalize(substring);
        if query.is_empty() {
            return Vec::new();
        }
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|entry| entry.lowered.contains(query.as_str()))
            .map(|entry| entry.name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// `(id, display name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.id.as_str(), entry.name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }
}

fn parse_identity(location: &str, body: &str) -> Result<BTreeMap<String, String>, SourceError> {
    let table: BTreeMap<String, String> =
        serde_json::from_str(body).map_err(|source| SourceError::Parse {
            location: location.to_string(),
            source,
        })?;
    let usable = table
        .iter()
        .any(|(id, name)| !id.trim().is_empty() && !name.trim().is_empty());
    if !usable {
        return Err(SourceError::Empty {
            location: location.to_string(),
        });
    }
    Ok(table)
}
