//! Resolution observer hooks.
//!
//! The coordinator reports every batch, every dropped candidate and every
//! duplicate id it discards. Observers are injected per coordinator; there is
//! no process-wide recorder.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use enrich::FoodId;

pub trait ResolutionMetrics: Send + Sync {
    /// One finished batch: candidates submitted, records kept, wall time.
    fn record_batch(&self, candidates: usize, resolved: usize, latency: Duration);

    /// A candidate that stayed empty after its fallback lookup.
    fn record_dropped(&self, term: &str);

    /// A record discarded because its id was already in the batch.
    fn record_duplicate(&self, id: &FoodId);
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl ResolutionMetrics for NoopMetrics {
    fn record_batch(&self, _candidates: usize, _resolved: usize, _latency: Duration) {}
    fn record_dropped(&self, _term: &str) {}
    fn record_duplicate(&self, _id: &FoodId) {}
}

/// Dropped terms kept by [`CountingMetrics::new`].
pub const DEFAULT_DROPPED_TERMS_CAPACITY: usize = 256;

/// Atomic counters, plus the most recent dropped terms for inspection.
///
/// The term log is bounded; once full, the oldest term is evicted. The
/// `dropped` counter keeps the full total.
#[derive(Debug)]
pub struct CountingMetrics {
    batches: AtomicU64,
    candidates: AtomicU64,
    resolved: AtomicU64,
    dropped: AtomicU64,
    duplicates: AtomicU64,
    term_capacity: usize,
    dropped_terms: Mutex<VecDeque<String>>,
}

impl Default for CountingMetrics {
    fn default() -> Self {
        Self::with_term_capacity(DEFAULT_DROPPED_TERMS_CAPACITY)
    }
}

impl CountingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` dropped terms; zero disables the log.
    pub fn with_term_capacity(capacity: usize) -> Self {
        Self {
            batches: AtomicU64::new(0),
            candidates: AtomicU64::new(0),
            resolved: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            term_capacity: capacity,
            dropped_terms: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
        }
    }

    pub fn batches(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }

    pub fn candidates(&self) -> u64 {
        self.candidates.load(Ordering::Relaxed)
    }

    pub fn resolved(&self) -> u64 {
        self.resolved.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    /// The most recent dropped terms, oldest first.
    pub fn dropped_terms(&self) -> Vec<String> {
        self.dropped_terms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl ResolutionMetrics for CountingMetrics {
    fn record_batch(&self, candidates: usize, resolved: usize, _latency: Duration) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.candidates.fetch_add(candidates as u64, Ordering::Relaxed);
        self.resolved.fetch_add(resolved as u64, Ordering::Relaxed);
    }

    fn record_dropped(&self, term: &str) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        if self.term_capacity == 0 {
            return;
        }
        let mut terms = self
            .dropped_terms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if terms.len() == self.term_capacity {
            terms.pop_front();
        }
        terms.push_back(term.to_string());
    }

    fn record_duplicate(&self, _id: &FoodId) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }
}
