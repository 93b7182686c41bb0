//! The controlled set of known ingredient names.
//!
//! Entries are normalized, deduplicated and kept sorted, so every first-hit
//! scan in the matcher visits them in the same order on every run.

use std::collections::HashSet;

use canonical::normalize;
use tracing::info;

use crate::error::SourceError;
use crate::source::{load_first, InlineProvider, ResourceProvider, SourceOrigin};

/// Packaged vocabulary shipped with the crate.
const PACKAGED_VOCABULARY: &str = include_str!("../data/vocabulary.json");

/// Last-resort vocabulary when no provider parses.
pub const EMBEDDED_VOCABULARY: &[&str] = &[
    "apple", "bacon", "banana", "basil", "beef", "bread", "broccoli", "butter", "carrot",
    "cheese", "chicken", "egg", "flour", "garlic", "lemon", "lettuce", "milk", "mushroom",
    "olive oil", "onion", "pasta", "pepper", "pork", "potato", "rice", "salmon", "salt",
    "spinach", "sugar", "tomato", "yogurt",
];

/// Immutable, sorted ingredient vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<String>,
    index: HashSet<String>,
    origin: SourceOrigin,
}

impl Vocabulary {
    /// Build from caller-supplied names. Names are normalized; blanks dropped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(entries, SourceOrigin::Inline)
    }

    /// Load from `providers` in order, falling back to [`EMBEDDED_VOCABULARY`].
    pub fn load(providers: &[Box<dyn ResourceProvider>]) -> Self {
        let vocabulary = match load_first("vocabulary", providers, parse_vocabulary) {
            Some((entries, origin)) => Self::build(entries, origin),
            None => Self::embedded(),
        };
        info!(
            entries = vocabulary.len(),
            origin = %vocabulary.origin,
            "vocabulary_loaded"
        );
        vocabulary
    }

    /// Load `providers` first, then the packaged table, then the embedded literal.
    pub fn load_with_defaults(mut providers: Vec<Box<dyn ResourceProvider>>) -> Self {
        providers.push(Box::new(Self::packaged_provider()));
        Self::load(&providers)
    }

    /// The packaged vocabulary, then the embedded literal.
    pub fn with_defaults() -> Self {
        Self::load_with_defaults(Vec::new())
    }

    pub fn packaged_provider() -> InlineProvider {
        InlineProvider::new("packaged:vocabulary.json", PACKAGED_VOCABULARY)
    }

    pub fn embedded() -> Self {
        Self::build(EMBEDDED_VOCABULARY.iter().copied(), SourceOrigin::Embedded)
    }

    fn build<I, S>(entries: I, origin: SourceOrigin) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<String> = entries
            .into_iter()
            .map(|entry| normalize(entry.as_ref()).into_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        sorted.sort();
        sorted.dedup();
        let index = sorted.iter().cloned().collect();
        Self {
            entries: sorted,
            index,
            origin,
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains(term)
    }

    /// Entries in ascending order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Entries starting with `prefix`, in ascending order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let start = self
            .entries
            .partition_point(|entry| entry.as_str() < prefix);
        self.entries[start..]
            .iter()
            .map(String::as_str)
            .take_while(move |entry| entry.starts_with(prefix))
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

fn parse_vocabulary(location: &str, body: &str) -> Result<Vec<String>, SourceError> {
    let raw: Vec<String> = serde_json::from_str(body).map_err(|source| SourceError::Parse {
        location: location.to_string(),
        source,
    })?;
    if raw.iter().all(|entry| entry.trim().is_empty()) {
        return Err(SourceError::Empty {
            location: location.to_string(),
        });
    }
    Ok(raw)
}
