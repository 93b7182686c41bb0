use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::types::CanonicalIngredient;

/// Session cache of resolved terms, keyed by normalized query.
///
/// Only positive hits are stored; a term that resolved to nothing is asked
/// again next time. Entries never expire.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: DashMap<String, CanonicalIngredient>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, term: &str) -> Option<CanonicalIngredient> {
        match self.entries.get(term) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, term: impl Into<String>, ingredient: CanonicalIngredient) {
        self.entries.insert(term.into(), ingredient);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
