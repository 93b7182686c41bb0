//! Configuration types for the ingredient normalizer.
//!
//! This module defines [`NormalizeConfig`], which controls how raw OCR,
//! barcode and search text is cleaned before vocabulary matching.
//!
//! # Versioning
//!
//! The `version` field tracks behavior changes. Any change to the filler list
//! or to the transforms applied by [`Normalizer`](crate::Normalizer) should be
//! accompanied by a version bump so cached candidates can be invalidated.
//!
//! # Examples
//!
//! ```rust
//! use canonical::NormalizeConfig;
//!
//! let config = NormalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(!config.normalize_unicode);
//! assert!(config.filler_prefixes.iter().any(|p| p == "fresh "));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Descriptor prefixes removed by [`strip_filler`](crate::strip_filler).
///
/// Each entry carries its trailing space so `"freshly"` is never mistaken for
/// `"fresh "`.
pub const DEFAULT_FILLER_PREFIXES: &[&str] = &[
    "fresh ", "frozen ", "raw ", "cooked ", "sliced ", "diced ", "chopped ", "minced ", "whole ",
    "organic ",
];

/// Configuration for the ingredient normalizer.
///
/// Cheap to clone and serde-friendly so it can be embedded in the YAML
/// engine configuration.
///
/// ```json
/// {
///   "version": 1,
///   "normalize_unicode": false,
///   "filler_prefixes": ["fresh ", "frozen "]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Behavior version. Must be >= 1.
    pub version: u32,

    /// Apply Unicode NFKC normalization before lowercasing.
    ///
    /// OCR engines sometimes emit ligatures (`ﬁ`) or full-width digits;
    /// NFKC folds those into their plain forms. Off by default so the
    /// normalizer only trims and lowercases.
    #[serde(default)]
    pub normalize_unicode: bool,

    /// Filler prefixes, tried in order. At most one is removed.
    #[serde(default = "NormalizeConfig::default_filler_prefixes")]
    pub filler_prefixes: Vec<String>,
}

impl NormalizeConfig {
    pub(crate) fn default_filler_prefixes() -> Vec<String> {
        DEFAULT_FILLER_PREFIXES
            .iter()
            .map(|prefix| (*prefix).to_string())
            .collect()
    }

    /// Validate the configuration.
    ///
    /// Prefixes must be non-empty, lowercase and end with a single space so
    /// they only ever match whole leading words of a normalized term.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        for prefix in &self.filler_prefixes {
            if prefix.trim().is_empty() {
                return Err(CanonicalError::InvalidConfig(
                    "filler prefixes must not be blank".into(),
                ));
            }
            if !prefix.ends_with(' ') {
                return Err(CanonicalError::InvalidConfig(format!(
                    "filler prefix '{prefix}' must end with a space"
                )));
            }
            if prefix.to_lowercase() != *prefix {
                return Err(CanonicalError::InvalidConfig(format!(
                    "filler prefix '{prefix}' must be lowercase"
                )));
            }
        }
        Ok(())
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: false,
            filler_prefixes: Self::default_filler_prefixes(),
        }
    }
}
