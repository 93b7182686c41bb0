//! Workspace umbrella crate for the pantry ingredient engine.
//!
//! Turns noisy text (OCR lines from receipts and labels, barcode product
//! names, typed search queries) into deduplicated canonical ingredient
//! records. The stages live in their own crates and are re-exported here:
//!
//! - [`canonical`]: text normalization and singular/plural helpers.
//! - [`matcher`]: the controlled vocabulary, candidate generation, vocabulary
//!   matching and the offline id/name identity map.
//! - [`enrich`]: enrichment sources (HTTP catalog, food directory, in-memory
//!   catalog), transport retry and the query cache.
//!
//! This crate adds the [`ResolutionCoordinator`] (concurrent fan-out with
//! id-keyed dedup), the relevance [`rank`]er, the YAML [`PantryConfig`] and
//! the [`Pantry`] facade tying them together.
//!
//! ```no_run
//! use pantry::{Pantry, RawToken, ScanSession, StaticCatalog, CanonicalIngredient};
//!
//! # async fn run() -> Result<(), pantry::EngineError> {
//! let pantry = Pantry::builder()
//!     .source(StaticCatalog::new("local", [CanonicalIngredient::new("11529", "Tomato")]))
//!     .build()?;
//!
//! let mut session = ScanSession::new();
//! let matches = pantry.scan_line(&RawToken::new("ROMA TOMATOES 2.99", 0), &mut session);
//! let result = pantry.resolve_matches(&matches).await;
//! for ingredient in &result.ingredients {
//!     println!("{} {}", ingredient.id, ingredient.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod identity_source;
pub mod input;
pub mod metrics;
pub mod ranker;

pub use canonical::{
    CanonicalError, NormalizeConfig, NormalizedTerm, Normalizer, normalize, pluralize,
    singularize, strip_filler,
};
pub use enrich::{
    CanonicalIngredient, CatalogClient, CatalogConfig, DirectoryConfig, EnrichError,
    EnrichmentSource, FoodDirectoryClient, FoodId, QueryCache, RetryConfig, StaticCatalog,
};
pub use matcher::{
    CandidateGenerator, CandidateMatch, EGG_FOOD_ID, FileProvider, IngredientIdentityMap,
    InlineProvider, MatchKind, MatcherConfig, MatcherError, RawToken, ResourceProvider,
    ScanSession, SourceError, SourceOrigin, Vocabulary, VocabularyMatcher,
};

pub use crate::config::{ConfigLoadError, PantryConfig, TableSources};
pub use crate::coordinator::{
    ResolutionCoordinator, ResolutionResult, ResolveConfig, fallback_term,
};
pub use crate::engine::{Pantry, PantryBuilder};
pub use crate::error::EngineError;
pub use crate::identity_source::IdentityMapSource;
pub use crate::input::{ProcessOutcome, ScanInput};
pub use crate::metrics::{
    CountingMetrics, DEFAULT_DROPPED_TERMS_CAPACITY, NoopMetrics, ResolutionMetrics,
};
pub use crate::ranker::{Named, Relevance, ScannedProduct, SearchItem, rank};
