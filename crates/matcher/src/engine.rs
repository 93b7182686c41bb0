use std::sync::Arc;

use canonical::{pluralize, singular_variants, singularize};
use tracing::trace;

use crate::error::MatcherError;
use crate::types::{CandidateMatch, MatchKind, MatcherConfig};
use crate::vocabulary::Vocabulary;


/// Tests normalized candidates against a [`Vocabulary`].
///
/// Cheap to clone; the vocabulary is shared.
#[derive(Debug, Clone)]
pub struct VocabularyMatcher {
    vocabulary: Arc<Vocabulary>,
    cfg: MatcherConfig,
}

impl VocabularyMatcher {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self::with_vocabulary_arc(Arc::new(vocabulary), MatcherConfig::default())
    }

    pub fn with_config(vocabulary: Vocabulary, cfg: MatcherConfig) -> Result<Self, MatcherError> {
        cfg.validate()?;
        Ok(Self::with_vocabulary_arc(Arc::new(vocabulary), cfg))
    }

    pub fn with_vocabulary_arc(vocabulary: Arc<Vocabulary>, cfg: MatcherConfig) -> Self {
        Self { vocabulary, cfg }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }

    /// Exact, then singular, then plural membership.
    ///
    /// `candidate` must already be normalized. The singular step tries the
    /// plain `-s` form before the `-es` form, so `"tomatoes"` finds `"tomato"`.
    pub fn match_term(&self, candidate: &str) -> Option<CandidateMatch> {
        if candidate.is_empty() {
            return None;
        }
        if self.vocabulary.contains(candidate) {
            return Some(hit(candidate, candidate, MatchKind::Exact));
        }
        for singular in singular_variants(candidate) {
            if self.vocabulary.contains(singular) {
                return Some(hit(candidate, singular, MatchKind::Singular));
            }
        }
        let plural = pluralize(candidate);
        if self.vocabulary.contains(&plural) {
            return Some(hit(candidate, &plural, MatchKind::Plural));
        }
        None
    }

    /// [`match_term`](Self::match_term), then a first-hit scan for product labels.
    ///
    /// For each entry in vocabulary order: candidate is a prefix of the entry
    /// ([`MatchKind::Prefix`]), the entry is a prefix of the candidate
    /// ([`MatchKind::Substring`]), or both agree once a trailing `s` is
    /// removed ([`MatchKind::Plural`]). The first entry satisfying any rule
    /// wins; no scoring across entries.
    pub fn match_fuzzy(&self, candidate: &str) -> Option<CandidateMatch> {
        if let Some(found) = self.match_term(candidate) {
            return Some(found);
        }
        let min_len = self.cfg.min_fuzzy_len;
        if candidate.chars().count() < min_len {
            return None;
        }
        let stripped = singularize(candidate);
        for entry in self.vocabulary.iter() {
            if entry.starts_with(candidate) {
                return Some(hit(candidate, entry, MatchKind::Prefix));
            }
            if entry.chars().count() >= min_len && candidate.starts_with(entry) {
                return Some(hit(candidate, entry, MatchKind::Substring));
            }
            if singularize(entry) == stripped {
                return Some(hit(candidate, entry, MatchKind::Plural));
            }
        }
        trace!(candidate, "no fuzzy match");
        None
    }

    /// Vocabulary entries starting with `prefix`, capped at `max_suggestions`.
    pub fn suggestions(&self, prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        self.vocabulary
            .with_prefix(prefix)
            .take(self.cfg.max_suggestions)
            .map(str::to_string)
            .collect()
    }
}

fn hit(term: &str, entry: &str, kind: MatchKind) -> CandidateMatch {
    CandidateMatch {
        term: term.to_string(),
        entry: entry.to_string(),
        kind,
    }
}
