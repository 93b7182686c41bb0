//! Offline, in-memory catalog.
//!
//! Used when no network source is configured, in demos, and as a
//! deterministic backend for tests.

use async_trait::async_trait;
use canonical::normalize;

use crate::error::EnrichError;
use crate::source::EnrichmentSource;
use crate::types::CanonicalIngredient;

#[derive(Debug, Clone)]
pub struct StaticCatalog {
    name: String,
    items: Vec<(String, CanonicalIngredient)>,
}

impl StaticCatalog {
    pub fn new(name: impl Into<String>, items: impl IntoIterator<Item = CanonicalIngredient>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (normalize(&item.name).into_string(), item))
            .collect();
        Self {
            name: name.into(),
            items,
        }
    }

    /// Parse the catalog wire format: a JSON array of ingredient records.
    pub fn from_json(name: impl Into<String>, body: &str) -> Result<Self, EnrichError> {
        let name = name.into();
        let items: Vec<CanonicalIngredient> =
            serde_json::from_str(body).map_err(|e| EnrichError::decode(&name, e))?;
        Ok(Self::new(name, items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact (case-insensitive) name matches first, then names starting with
    /// `query`; insertion order within each group.
    pub fn lookup(&self, query: &str, limit: usize) -> Vec<CanonicalIngredient> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }
        let exact = self
            .items
            .iter()
            .filter(|(lowered, _)| lowered == query.as_str());
        let prefix = self
            .items
            .iter()
            .filter(|(lowered, _)| lowered != query.as_str() && lowered.starts_with(query.as_str()));
        exact
            .chain(prefix)
            .take(limit)
            .map(|(_, item)| item.clone())
            .collect()
    }
}

#[async_trait]
impl EnrichmentSource for StaticCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        Ok(self.lookup(query, limit))
    }
}
