use unicode_categories::UnicodeCategories;
use unicode_segmentation::UnicodeSegmentation;

/// Whitespace-separated words with leading/trailing punctuation trimmed.
///
/// Used to build contiguous n-gram windows from an OCR line, so `"Tomatoes,"`
/// and `"(basil)"` line up with their vocabulary forms. Words that are pure
/// punctuation are dropped.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(trim_punctuation)
        .filter(|word| !word.is_empty())
        .collect()
}

/// Words split on whitespace and punctuation (UAX #29 word boundaries).
///
/// `"salt&pepper"` yields `["salt", "pepper"]`; numeric tokens such as
/// `"2.99"` stay intact.
pub fn word_tokens(text: &str) -> Vec<&str> {
    text.unicode_words().collect()
}

/// Trim Unicode punctuation from both ends of a word.
pub fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|ch: char| ch.is_punctuation())
}
