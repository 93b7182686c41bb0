//! N-gram candidate generation for OCR lines.
//!
//! A receipt line such as `"LG ROMA TOMATOES 2.99"` rarely matches the
//! vocabulary as a whole. The generator proposes, in order:
//!
//! 1. the whole normalized line,
//! 2. every 2-word window, then every 3-word window,
//! 3. every single word (split on whitespace and punctuation).
//!
//! Each candidate is tested immediately; only matches are emitted, and only
//! the first time a [`ScanSession`] sees them, so repeated camera frames of
//! the same receipt do not produce duplicate UI rows.

use std::collections::HashSet;

use canonical::{normalize, word_tokens, words};
use tracing::debug;

use crate::engine::VocabularyMatcher;
use crate::types::{CandidateMatch, RawToken};

/// Candidates already matched during one scanning session.
#[derive(Debug, Default, Clone)]
pub struct ScanSession {
    seen: HashSet<String>,
    lines: usize,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.seen.contains(candidate)
    }

    /// Number of distinct matched candidates.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Number of lines fed through this session.
    pub fn lines_processed(&self) -> usize {
        self.lines
    }

    pub fn reset(&mut self) {
        self.seen.clear();
        self.lines = 0;
    }

    fn insert(&mut self, candidate: &str) {
        self.seen.insert(candidate.to_string());
    }
}

/// Produces and tests candidates for one OCR line at a time.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator<'a> {
    matcher: &'a VocabularyMatcher,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(matcher: &'a VocabularyMatcher) -> Self {
        Self { matcher }
    }

    /// Every candidate string for `line`, in test order, without duplicates.
    pub fn candidates(&self, line: &RawToken) -> Vec<String> {
        let normalized = normalize(&line.text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut ordered = Vec::new();
        let mut queued = HashSet::new();
        let mut push = |candidate: String| {
            if queued.insert(candidate.clone()) {
                ordered.push(candidate);
            }
        };

        push(normalized.as_str().to_string());

        let line_words = words(normalized.as_str());
        for width in [2usize, 3] {
            if line_words.len() < width {
                continue;
            }
            for window in line_words.windows(width) {
                push(window.join(" "));
            }
        }

        for word in word_tokens(normalized.as_str()) {
            push(word.to_string());
        }

        ordered
    }

    /// Test every candidate of `line`, returning matches new to `session`.
    pub fn generate(&self, line: &RawToken, session: &mut ScanSession) -> Vec<CandidateMatch> {
        session.lines += 1;
        let candidates = self.candidates(line);
        let tested = candidates.len();

        let mut fresh = Vec::new();
        for candidate in candidates {
            if session.contains(&candidate) {
                continue;
            }
            if let Some(found) = self.matcher.match_term(&candidate) {
                session.insert(&candidate);
                fresh.push(found);
            }
        }

        debug!(
            line_index = line.line_index,
            tested,
            matched = fresh.len(),
            session_size = session.len(),
            "candidates_generated"
        );
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;

    fn matcher_with(entries: &[&str]) -> VocabularyMatcher {
        VocabularyMatcher::new(Vocabulary::from_entries(entries.iter().copied()))
    }

    #[test]
    fn large_tomatoes_candidates_and_single_match() {
        let matcher = matcher_with(&["tomatoes"]);
        let generator = CandidateGenerator::new(&matcher);
        let line = RawToken::new("large tomatoes", 0);

        let candidates = generator.candidates(&line);
        for expected in ["large tomatoes", "large", "tomatoes"] {
            assert!(
                candidates.iter().any(|c| c == expected),
                "missing candidate {expected}"
            );
        }

        let mut session = ScanSession::new();
        let matches = generator.generate(&line, &mut session);
        let terms: Vec<&str> = matches.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(terms, vec!["tomatoes"]);
    }

    #[test]
    fn candidate_order_is_line_then_windows_then_words() {
        let matcher = matcher_with(&[]);
        let generator = CandidateGenerator::new(&matcher);
        let candidates = generator.candidates(&RawToken::new("Red Bell Pepper Diced", 3));
        assert_eq!(
            candidates,
            vec![
                "red bell pepper diced",
                "red bell",
                "bell pepper",
                "pepper diced",
                "red bell pepper",
                "bell pepper diced",
                "red",
                "bell",
                "pepper",
                "diced",
            ]
        );
    }

    #[test]
    fn punctuation_is_split_for_word_fallback() {
        let matcher = matcher_with(&["salt", "pepper"]);
        let generator = CandidateGenerator::new(&matcher);
        let mut session = ScanSession::new();
        let matches = generator.generate(&RawToken::new("SALT&PEPPER", 0), &mut session);
        let entries: Vec<&str> = matches.iter().map(|m| m.entry.as_str()).collect();
        assert_eq!(entries, vec!["salt", "pepper"]);
    }

    #[test]
    fn windows_find_multi_word_entries() {
        let matcher = matcher_with(&["olive oil", "olive"]);
        let generator = CandidateGenerator::new(&matcher);
        let mut session = ScanSession::new();
        let matches = generator.generate(
            &RawToken::new("EXTRA VIRGIN OLIVE OIL, 500ml", 0),
            &mut session,
        );
        let terms: Vec<&str> = matches.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(terms, vec!["olive oil", "olive"]);
    }

    #[test]
    fn session_suppresses_repeated_frames() {
        let matcher = matcher_with(&["egg", "milk"]);
        let generator = CandidateGenerator::new(&matcher);
        let mut session = ScanSession::new();

        let first = generator.generate(&RawToken::new("eggs milk", 0), &mut session);
        assert_eq!(first.len(), 2);

        let second = generator.generate(&RawToken::new("EGGS  milk", 1), &mut session);
        assert!(second.is_empty());
        assert_eq!(session.lines_processed(), 2);
        assert!(session.contains("eggs"));

        session.reset();
        let third = generator.generate(&RawToken::new("eggs", 2), &mut session);
        assert_eq!(third.len(), 1);
    }

    #[test]
    fn unmatched_candidates_are_not_remembered() {
        let matcher = matcher_with(&["kale"]);
        let generator = CandidateGenerator::new(&matcher);
        let mut session = ScanSession::new();
        generator.generate(&RawToken::new("curly kale bunch", 0), &mut session);
        assert_eq!(session.len(), 1);
        assert!(!session.contains("curly"));
    }

    #[test]
    fn blank_line_yields_nothing() {
        let matcher = matcher_with(&["kale"]);
        let generator = CandidateGenerator::new(&matcher);
        let mut session = ScanSession::new();
        assert!(generator.candidates(&RawToken::new("  \n", 0)).is_empty());
        assert!(generator
            .generate(&RawToken::new("", 0), &mut session)
            .is_empty());
    }
}
