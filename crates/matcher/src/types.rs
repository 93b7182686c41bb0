use serde::{Deserialize, Serialize};

use crate::error::MatcherError;

/// Which rule paired a candidate with its vocabulary entry.
///
/// Variants are listed in the order the matcher tries them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The candidate is a vocabulary entry.
    Exact,
    /// A singular form of the candidate is a vocabulary entry.
    Singular,
    /// The plural of the candidate is a vocabulary entry, or (fuzzy only) both
    /// agree once a trailing `s` is removed.
    Plural,
    /// Fuzzy: the candidate is a prefix of a vocabulary entry.
    Prefix,
    /// Fuzzy: a vocabulary entry is a prefix of the candidate.
    Substring,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Singular => "singular",
            MatchKind::Plural => "plural",
            MatchKind::Prefix => "prefix",
            MatchKind::Substring => "substring",
        }
    }

    /// True for the rules only [`match_fuzzy`](crate::VocabularyMatcher::match_fuzzy) applies.
    pub fn is_fuzzy(&self) -> bool {
        matches!(self, MatchKind::Prefix | MatchKind::Substring)
    }
}

/// A candidate paired with the vocabulary entry it matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateMatch {
    /// The normalized candidate text that was tested.
    pub term: String,
    /// The vocabulary entry it resolved to.
    pub entry: String,
    pub kind: MatchKind,
}

/// One recognized text line handed over by the OCR collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    /// Position of the line within its frame; carried through for logging.
    #[serde(default)]
    pub line_index: usize,
}

impl RawToken {
    pub fn new(text: impl Into<String>, line_index: usize) -> Self {
        Self {
            text: text.into(),
            line_index,
        }
    }
}

impl From<&str> for RawToken {
    fn from(text: &str) -> Self {
        RawToken::new(text, 0)
    }
}

/// Tuning knobs for the vocabulary matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Candidates shorter than this (in characters) skip the fuzzy prefix
    /// rules, and vocabulary entries shorter than this are never treated as
    /// a prefix of the candidate. Keeps `"a"` from matching `"apple"`.
    #[serde(default = "MatcherConfig::default_min_fuzzy_len")]
    pub min_fuzzy_len: usize,
    /// Upper bound on vocabulary suggestions returned for a search prefix.
    #[serde(default = "MatcherConfig::default_max_suggestions")]
    pub max_suggestions: usize,
}

impl MatcherConfig {
    pub(crate) fn default_min_fuzzy_len() -> usize {
        3
    }

    pub(crate) fn default_max_suggestions() -> usize {
        8
    }

    pub fn validate(&self) -> Result<(), MatcherError> {
        if self.min_fuzzy_len == 0 {
            return Err(MatcherError::InvalidConfig(
                "min_fuzzy_len must be greater than zero".into(),
            ));
        }
        if self.max_suggestions == 0 {
            return Err(MatcherError::InvalidConfig(
                "max_suggestions must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_fuzzy_len: Self::default_min_fuzzy_len(),
            max_suggestions: Self::default_max_suggestions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MatcherConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_min_fuzzy_len_rejected() {
        let cfg = MatcherConfig {
            min_fuzzy_len: 0,
            ..Default::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatcherError::InvalidConfig(msg) => assert!(msg.contains("min_fuzzy_len")),
        }
    }

    #[test]
    fn match_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MatchKind::Singular).unwrap();
        assert_eq!(json, "\"singular\"");
        assert_eq!(MatchKind::Substring.as_str(), "substring");
        assert!(MatchKind::Prefix.is_fuzzy());
        assert!(!MatchKind::Plural.is_fuzzy());
    }

    #[test]
    fn raw_token_defaults_line_index() {
        let token: RawToken = serde_json::from_str(r#"{"text": "Eggs 12ct"}"#).unwrap();
        assert_eq!(token, RawToken::new("Eggs 12ct", 0));
    }
}
