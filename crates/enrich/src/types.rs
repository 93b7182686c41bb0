use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier of a canonical ingredient; the dedup key of a batch.
///
/// Upstream catalogs disagree on whether ids are strings or numbers, so both
/// deserialize into the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FoodId(String);

impl FoodId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FoodId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FoodId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for FoodId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Text(text) => FoodId(text),
            Wire::Unsigned(n) => FoodId(n.to_string()),
            Wire::Signed(n) => FoodId(n.to_string()),
        })
    }
}

/// A resolved, enriched ingredient record.
///
/// Field names on the wire follow the internal catalog
/// (`shelfLifeDays`, `imageURL`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalIngredient {
    pub id: FoodId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        rename = "imageURL",
        alias = "imageUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_life_days: Option<u32>,
}

impl CanonicalIngredient {
    /// Record with only an id and display name.
    pub fn new(id: impl Into<FoodId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            image_url: None,
            unit: None,
            shelf_life_days: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_shelf_life_days(mut self, days: u32) -> Self {
        self.shelf_life_days = Some(days);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}
