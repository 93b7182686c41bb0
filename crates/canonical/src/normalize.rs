use std::borrow::{Borrow, Cow};
use std::fmt;
use std::ops::Deref;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::config::{NormalizeConfig, DEFAULT_FILLER_PREFIXES};
use crate::error::CanonicalError;
use crate::whitespace::collapse_whitespace;

/// Lowercased, trimmed text with single-space word separators.
///
/// Only [`Normalizer::normalize`] and [`normalize`] construct one, so holding a
/// `NormalizedTerm` means the text already went through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedTerm(String);

impl NormalizedTerm {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for NormalizedTerm {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedTerm {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NormalizedTerm> for String {
    fn from(term: NormalizedTerm) -> Self {
        term.0
    }
}

/// Configured normalizer.
///
/// Holds a validated [`NormalizeConfig`]; all methods are pure and can be
/// shared across threads behind an `Arc` or a plain reference.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    cfg: NormalizeConfig,
}

impl Normalizer {
    /// Build a normalizer, rejecting invalid filler lists.
    pub fn new(cfg: NormalizeConfig) -> Result<Self, CanonicalError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.cfg
    }

    /// Trim, lowercase and collapse interior whitespace.
    ///
    /// Idempotent: `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize(&self, text: &str) -> NormalizedTerm {
        let unified: Cow<str> = if self.cfg.normalize_unicode {
            Cow::Owned(text.nfkc().collect::<String>())
        } else {
            Cow::Borrowed(text)
        };
        NormalizedTerm(collapse_whitespace(&unified.to_lowercase()))
    }

    /// Remove at most one configured filler prefix.
    pub fn strip_filler<'a>(&self, text: &'a str) -> &'a str {
        strip_first_prefix(text, self.cfg.filler_prefixes.iter().map(String::as_str))
    }

    /// Normalize, then strip one filler prefix.
    ///
    /// A term that is nothing but a filler word (`"fresh "` after trimming is
    /// just `"fresh"`) never loses its only word.
    pub fn clean(&self, text: &str) -> NormalizedTerm {
        let normalized = self.normalize(text);
        let stripped = self.strip_filler(normalized.as_str());
        if stripped.len() == normalized.len() {
            normalized
        } else {
            NormalizedTerm(stripped.to_string())
        }
    }
}

/// Normalize with the default configuration.
pub fn normalize(text: &str) -> NormalizedTerm {
    NormalizedTerm(collapse_whitespace(&text.to_lowercase()))
}

/// Remove at most one default filler prefix (`"fresh "`, `"frozen "`, ...).
///
/// ```rust
/// use canonical::strip_filler;
///
/// assert_eq!(strip_filler("fresh basil"), "basil");
/// assert_eq!(strip_filler("frozen organic peas"), "organic peas");
/// assert_eq!(strip_filler("freshly ground pepper"), "freshly ground pepper");
/// ```
pub fn strip_filler(text: &str) -> &str {
    strip_first_prefix(text, DEFAULT_FILLER_PREFIXES.iter().copied())
}

fn strip_first_prefix<'a, 'p>(text: &'a str, prefixes: impl Iterator<Item = &'p str>) -> &'a str {
    for prefix in prefixes {
        if let Some(rest) = text.strip_prefix(prefix) {
            return rest;
        }
    }
    text
}

/// Drop a trailing `s` from terms longer than two characters.
///
/// Suffix heuristic only: `"tomatoes"` becomes `"tomatoe"`, `"glass"` becomes
/// `"glas"`. Irregular nouns are not handled.
pub fn singularize(term: &str) -> Cow<'_, str> {
    if term.ends_with('s') && term.chars().count() > 2 {
        Cow::Borrowed(&term[..term.len() - 1])
    } else {
        Cow::Borrowed(term)
    }
}

/// Append `s`.
pub fn pluralize(term: &str) -> String {
    let mut plural = String::with_capacity(term.len() + 1);
    plural.push_str(term);
    plural.push('s');
    plural
}

/// Singular forms worth probing for a term, most literal first.
///
/// Yields the [`singularize`] form and, for `-es` endings on terms longer
/// than three characters, the form with `es` removed (`"tomatoes"` →
/// `"tomatoe"`, `"tomato"`). Empty when the term has no plural ending.
pub fn singular_variants(term: &str) -> Vec<&str> {
    let mut variants = Vec::with_capacity(2);
    let singular = singularize(term);
    if singular.len() == term.len() {
        return variants;
    }
    variants.push(&term[..term.len() - 1]);
    if term.ends_with("es") && term.chars().count() > 3 {
        variants.push(&term[..term.len() - 2]);
    }
    variants
}
