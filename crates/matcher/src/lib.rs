//! # Pantry Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` turns noisy text (OCR receipt lines, product labels) into
//! entries of a controlled ingredient vocabulary, and maps ingredient names
//! to stable food ids. It is purely in-memory and synchronous; network
//! enrichment lives in the `enrich` crate and the batch coordinator in the
//! umbrella `pantry` crate.
//!
//! ## Core Types
//!
//! - [`Vocabulary`]: sorted, normalized set of known names, loaded through an
//!   ordered [`ResourceProvider`] chain with an embedded fallback.
//! - [`VocabularyMatcher`]: exact / singular / plural membership, plus the
//!   first-hit fuzzy rules used for product labels.
//! - [`CandidateGenerator`] and [`ScanSession`]: n-gram candidates for one
//!   OCR line and the per-session dedup set.
//! - [`IngredientIdentityMap`]: id ↔ display name lookup, with `egg`
//!   hardwired to [`EGG_FOOD_ID`].
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{CandidateGenerator, RawToken, ScanSession, Vocabulary, VocabularyMatcher};
//!
//! let matcher = VocabularyMatcher::new(Vocabulary::from_entries(["tomato", "basil"]));
//! let generator = CandidateGenerator::new(&matcher);
//! let mut session = ScanSession::new();
//!
//! let hits = generator.generate(&RawToken::new("LG ROMA TOMATOES 2.99", 0), &mut session);
//! assert_eq!(hits[0].entry, "tomato");
//! ```
//!
//! ## Data Sources
//!
//! Both tables try caller-supplied providers first, then the JSON packaged
//! with this crate, then a small literal compiled into the binary. A
//! corrupted file is logged and skipped; loading itself never fails.

pub mod candidates;
pub mod engine;
pub mod error;
pub mod identity;
pub mod source;
pub mod types;
pub mod vocabulary;

pub use crate::candidates::{CandidateGenerator, ScanSession};
pub use crate::engine::VocabularyMatcher;
pub use crate::error::{MatcherError, SourceError};
pub use crate::identity::{IngredientIdentityMap, EGG_FOOD_ID, EMBEDDED_IDENTITY};
pub use crate::source::{load_first, FileProvider, InlineProvider, ResourceProvider, SourceOrigin};
pub use crate::types::{CandidateMatch, MatchKind, MatcherConfig, RawToken};
pub use crate::vocabulary::{Vocabulary, EMBEDDED_VOCABULARY};
