use std::sync::Arc;

use async_trait::async_trait;
use enrich::{CanonicalIngredient, EnrichError, EnrichmentSource};
use matcher::IngredientIdentityMap;

/// Offline last-resort source answering from the identity map.
///
/// Produces id and display name only; no category, unit or image.
#[derive(Debug, Clone)]
pub struct IdentityMapSource {
    map: Arc<IngredientIdentityMap>,
}

impl IdentityMapSource {
    pub fn new(map: Arc<IngredientIdentityMap>) -> Self {
        Self { map }
    }

    pub fn lookup(&self, query: &str) -> Option<CanonicalIngredient> {
        let id = self.map.get_food_id(query)?;
        let name = self.map.get_food_name(id)?;
        Some(CanonicalIngredient::new(id, name))
    }
}

#[async_trait]
impl EnrichmentSource for IdentityMapSource {
    fn name(&self) -> &str {
        "identity"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.lookup(query).into_iter().collect())
    }
}
