//! Concurrent resolution of matched candidates into canonical ingredients.
//!
//! A batch fans out one task per candidate on a [`JoinSet`]. Each task asks
//! the primary sources for the candidate, retries once with the
//! singular/plural variant when nothing comes back, and only then consults
//! the terminal sources (the offline identity map) with the same two terms.
//! A hit is written into a shared sink. The sink owns the seen-id set; the first record for an id
//! wins and later ones are counted and discarded. The batch returns only
//! after every task has finished.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use canonical::{normalize, pluralize, singularize};
use enrich::{CanonicalIngredient, EnrichmentSource, FoodId, QueryCache};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::EngineError;
use crate::metrics::{NoopMetrics, ResolutionMetrics};

/// Tuning knobs for [`ResolutionCoordinator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Records requested per lookup; only the first is used.
    pub lookup_limit: usize,
    /// Remember positive lookups for the lifetime of the coordinator.
    pub cache_enabled: bool,
    /// Register the identity map as a last-resort source.
    pub identity_fallback: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            lookup_limit: 1,
            cache_enabled: true,
            identity_fallback: true,
        }
    }
}

impl ResolveConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.lookup_limit == 0 {
            return Err(EngineError::InvalidResolveConfig(
                "lookup_limit must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// One finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// Records in candidate order; ids are unique.
    pub ingredients: Vec<CanonicalIngredient>,
    /// Candidates still empty after their fallback, in candidate order.
    pub dropped: Vec<String>,
    /// Records discarded because their id was already present.
    pub duplicates: usize,
}

impl ResolutionResult {
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &FoodId> {
        self.ingredients.iter().map(|ingredient| &ingredient.id)
    }
}

/// The single mutation point shared by every lookup task of a batch.
#[derive(Default)]
struct BatchSink {
    seen: HashSet<FoodId>,
    found: Vec<(usize, CanonicalIngredient)>,
    duplicates: usize,
}

impl BatchSink {
    /// `false` when the id was already claimed by an earlier writer.
    fn offer(&mut self, index: usize, ingredient: CanonicalIngredient) -> bool {
        if !self.seen.insert(ingredient.id.clone()) {
            self.duplicates += 1;
            return false;
        }
        self.found.push((index, ingredient));
        true
    }
}

/// Shared, immutable pieces handed to every lookup task.
struct Lookup {
    sources: Vec<Arc<dyn EnrichmentSource>>,
    terminal: Vec<Arc<dyn EnrichmentSource>>,
    cache: Option<QueryCache>,
    limit: usize,
}

impl Lookup {
    /// Cache, then each tier with the term and its one fallback variant.
    async fn resolve_term(&self, term: &str) -> Option<CanonicalIngredient> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(term) {
                debug!(term, "resolve_cache_hit");
                return Some(hit);
            }
        }

        let variant = fallback_term(term);
        let mut found = self.query_tier(&self.sources, term, variant.as_deref()).await;
        if found.is_none() && !self.terminal.is_empty() {
            debug!(term, "resolve_terminal");
            found = self
                .query_tier(&self.terminal, term, variant.as_deref())
                .await;
        }

        if let (Some(cache), Some(ingredient)) = (&self.cache, &found) {
            cache.insert(term, ingredient.clone());
        }
        found
    }

    /// The term against `tier`, then its variant against the same tier.
    async fn query_tier(
        &self,
        tier: &[Arc<dyn EnrichmentSource>],
        term: &str,
        variant: Option<&str>,
    ) -> Option<CanonicalIngredient> {
        if let Some(found) = self.query_sources(tier, term).await {
            return Some(found);
        }
        let variant = variant?;
        debug!(term, variant, "resolve_fallback");
        self.query_sources(tier, variant).await
    }

    /// First non-empty answer across `tier`, in registration order.
    async fn query_sources(
        &self,
        tier: &[Arc<dyn EnrichmentSource>],
        term: &str,
    ) -> Option<CanonicalIngredient> {
        for source in tier {
            match source.search(term, self.limit).await {
                Ok(items) => {
                    if let Some(first) = items.into_iter().next() {
                        return Some(first);
                    }
                }
                Err(err) => {
                    warn!(source = source.name(), term, error = %err, "resolve_source_error");
                }
            }
        }
        None
    }
}

/// The single term-variant retry for an empty lookup.
///
/// `egg` and `eggs` map to each other explicitly; otherwise a trailing `s`
/// is dropped, or added when absent. `None` when the variant would equal the
/// term (e.g. `"as"`).
pub fn fallback_term(term: &str) -> Option<String> {
    match term {
        "egg" => return Some("eggs".to_string()),
        "eggs" => return Some("egg".to_string()),
        _ => {}
    }
    let variant = if term.ends_with('s') {
        singularize(term).into_owned()
    } else {
        pluralize(term)
    };
    (variant != term).then_some(variant)
}

/// Resolves batches of candidate terms through injected enrichment sources.
pub struct ResolutionCoordinator {
    lookup: Arc<Lookup>,
    metrics: Arc<dyn ResolutionMetrics>,
    /// One batch at a time per coordinator.
    gate: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for ResolutionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.source_names();
        f.debug_struct("ResolutionCoordinator")
            .field("sources", &names)
            .field("limit", &self.lookup.limit)
            .field("cache", &self.lookup.cache.is_some())
            .finish()
    }
}

impl ResolutionCoordinator {
    /// Coordinator over `sources` with the default [`ResolveConfig`].
    pub fn new(sources: Vec<Arc<dyn EnrichmentSource>>) -> Result<Self, EngineError> {
        Self::with_config(sources, ResolveConfig::default(), Arc::new(NoopMetrics))
    }

    /// Fails with [`EngineError::NoEnrichmentSource`] when `sources` is empty.
    pub fn with_config(
        sources: Vec<Arc<dyn EnrichmentSource>>,
        cfg: ResolveConfig,
        metrics: Arc<dyn ResolutionMetrics>,
    ) -> Result<Self, EngineError> {
        Self::with_tiers(sources, Vec::new(), cfg, metrics)
    }

    /// Coordinator with a terminal tier.
    ///
    /// `terminal` sources are asked only after every primary source came back
    /// empty for both the term and its fallback variant. Fails with
    /// [`EngineError::NoEnrichmentSource`] when both tiers are empty.
    pub fn with_tiers(
        sources: Vec<Arc<dyn EnrichmentSource>>,
        terminal: Vec<Arc<dyn EnrichmentSource>>,
        cfg: ResolveConfig,
        metrics: Arc<dyn ResolutionMetrics>,
    ) -> Result<Self, EngineError> {
        if sources.is_empty() && terminal.is_empty() {
            return Err(EngineError::NoEnrichmentSource);
        }
        cfg.validate()?;
        let lookup = Lookup {
            sources,
            terminal,
            cache: cfg.cache_enabled.then(QueryCache::new),
            limit: cfg.lookup_limit,
        };
        Ok(Self {
            lookup: Arc::new(lookup),
            metrics,
            gate: tokio::sync::Mutex::new(()),
        })
    }

    /// Primary sources in query order, followed by the terminal tier.
    pub fn source_names(&self) -> Vec<&str> {
        self.lookup
            .sources
            .iter()
            .chain(&self.lookup.terminal)
            .map(|s| s.name())
            .collect()
    }

    pub fn cache(&self) -> Option<&QueryCache> {
        self.lookup.cache.as_ref()
    }

    /// Resolve every candidate concurrently and join before returning.
    ///
    /// Candidates are normalized; blanks and repeats are skipped. Never
    /// fails: lookups that error or stay empty end up in
    /// [`ResolutionResult::dropped`].
    pub async fn resolve<I, S>(&self, candidates: I) -> ResolutionResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique = HashSet::new();
        let terms: Vec<String> = candidates
            .into_iter()
            .map(|candidate| normalize(candidate.as_ref()).into_string())
            .filter(|term| !term.is_empty() && unique.insert(term.clone()))
            .collect();

        let span = info_span!("pantry.resolve", candidates = terms.len());
        self.resolve_terms(terms).instrument(span).await
    }

    async fn resolve_terms(&self, terms: Vec<String>) -> ResolutionResult {
        let _gate = self.gate.lock().await;
        let start = Instant::now();
        let sink = Arc::new(Mutex::new(BatchSink::default()));

        let mut tasks = JoinSet::new();
        let mut task_terms = HashMap::with_capacity(terms.len());
        for (index, term) in terms.iter().enumerate() {
            let lookup = Arc::clone(&self.lookup);
            let metrics = Arc::clone(&self.metrics);
            let sink = Arc::clone(&sink);
            let task_term = term.clone();
            let handle = tasks.spawn(
                async move {
                    let Some(ingredient) = lookup.resolve_term(&task_term).await else {
                        return Some(index);
                    };
                    let id = ingredient.id.clone();
                    let accepted = sink
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .offer(index, ingredient);
                    if !accepted {
                        debug!(term = %task_term, id = %id, "resolve_duplicate");
                        metrics.record_duplicate(&id);
                    }
                    None
                }
                .in_current_span(),
            );
            task_terms.insert(handle.id(), index);
        }

        let mut dropped_indices = Vec::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, Some(index))) => dropped_indices.push(index),
                Ok((_, None)) => {}
                Err(err) => {
                    warn!(error = %err, "resolve_task_failed");
                    if let Some(&index) = task_terms.get(&err.id()) {
                        dropped_indices.push(index);
                    }
                }
            }
        }

        dropped_indices.sort_unstable();
        let dropped: Vec<String> = dropped_indices
            .into_iter()
            .map(|index| terms[index].clone())
            .collect();
        for term in &dropped {
            self.metrics.record_dropped(term);
        }

        let BatchSink {
            mut found,
            duplicates,
            ..
        } = std::mem::take(&mut *sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));
        found.sort_by_key(|(index, _)| *index);
        let ingredients: Vec<CanonicalIngredient> =
            found.into_iter().map(|(_, ingredient)| ingredient).collect();

        let latency = start.elapsed();
        self.metrics
            .record_batch(terms.len(), ingredients.len(), latency);
        info!(
            candidates = terms.len(),
            resolved = ingredients.len(),
            dropped = dropped.len(),
            duplicates,
            elapsed_micros = latency.as_micros() as u64,
            "resolve_batch"
        );
        if !dropped.is_empty() {
            warn!(terms = ?dropped, "resolve_dropped");
        }

        ResolutionResult {
            ingredients,
            dropped,
            duplicates,
        }
    }
}
