//! Relevance ranking of search results against a typed query.
//!
//! Ordering, most relevant first:
//!
//! 1. name equals the query (case-insensitive),
//! 2. name starts with the query,
//! 3. higher token-positional score: for each position `i`, one point when
//!    the name's `i`-th word starts with the query's `i`-th word,
//! 4. name in ascending alphabetical order, then original position.
//!
//! The sort is stable and depends only on names and input order.

use std::cmp::Ordering;

use canonical::{normalize, words};
use enrich::CanonicalIngredient;
use serde::Serialize;

/// Anything the ranker can order by display name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for CanonicalIngredient {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

impl Named for &str {
    fn name(&self) -> &str {
        self
    }
}

/// A product the caller scanned (barcode lookup) and wants listed next to
/// catalog results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedProduct {
    pub barcode: String,
    pub label: String,
    /// Ingredient the label resolved to, if any.
    pub ingredient: Option<CanonicalIngredient>,
}

impl ScannedProduct {
    pub fn new(barcode: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            label: label.into(),
            ingredient: None,
        }
    }
}

/// One row of a mixed search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchItem {
    Catalog(CanonicalIngredient),
    Scanned(ScannedProduct),
}

impl Named for SearchItem {
    fn name(&self) -> &str {
        match self {
            SearchItem::Catalog(ingredient) => &ingredient.name,
            SearchItem::Scanned(product) => &product.label,
        }
    }
}

/// How well one name answers the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relevance {
    pub exact: bool,
    pub prefix: bool,
    pub token_score: usize,
}

impl Relevance {
    pub fn of(name: &str, query: &str) -> Self {
        let name = normalize(name);
        let query = normalize(query);
        Self::of_normalized(name.as_str(), query.as_str())
    }

    fn of_normalized(name: &str, query: &str) -> Self {
        let token_score = words(name)
            .iter()
            .zip(words(query).iter())
            .filter(|(name_word, query_word)| name_word.starts_with(**query_word))
            .count();
        Self {
            exact: name == query,
            prefix: name.starts_with(query),
            token_score,
        }
    }

    /// `Less` means `self` ranks first.
    fn precedence(&self, other: &Self) -> Ordering {
        other
            .exact
            .cmp(&self.exact)
            .then_with(|| other.prefix.cmp(&self.prefix))
            .then_with(|| other.token_score.cmp(&self.token_score))
    }
}

/// Order `items` by relevance to `query`.
///
/// A blank query carries no signal and returns `items` unchanged.
pub fn rank<T: Named>(items: Vec<T>, query: &str) -> Vec<T> {
    let query = normalize(query);
    if query.is_empty() {
        return items;
    }

    let mut keyed: Vec<(Relevance, String, T)> = items
        .into_iter()
        .map(|item| {
            let name = normalize(item.name()).into_string();
            let relevance = Relevance::of_normalized(&name, query.as_str());
            (relevance, name, item)
        })
        .collect();

    // `sort_by` is stable, so the original position is the final tie-break.
    keyed.sort_by(|(rel_a, name_a, _), (rel_b, name_b, _)| {
        rel_a.precedence(rel_b).then_with(|| name_a.cmp(name_b))
    });

    keyed.into_iter().map(|(_, _, item)| item).collect()
}
