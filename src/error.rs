use canonical::CanonicalError;
use enrich::EnrichError;
use matcher::MatcherError;
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Errors raised while building a [`Pantry`](crate::Pantry) or a
/// [`ResolutionCoordinator`](crate::ResolutionCoordinator).
///
/// Once built, the engine never returns an error: lookups that fail are
/// dropped from the batch and reported through metrics.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Resolution needs at least one enrichment source.
    #[error("no enrichment source configured")]
    NoEnrichmentSource,
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    #[error("normalizer: {0}")]
    Canonical(#[from] CanonicalError),
    #[error("matcher: {0}")]
    Matcher(#[from] MatcherError),
    #[error("enrichment source: {0}")]
    Enrich(#[from] EnrichError),
    #[error("invalid resolve config: {0}")]
    InvalidResolveConfig(String),
}
