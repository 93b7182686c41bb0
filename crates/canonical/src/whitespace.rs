//! Whitespace cleanup for OCR output.
//!
//! Receipt and label OCR returns lines with tabs, doubled spaces, stray
//! carriage returns and non-breaking spaces between words. [`collapse_whitespace`]
//! folds all of those into single ASCII spaces so n-gram windows built from
//! the line are stable across frames.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  roma \t tomatoes\r\n"), "roma tomatoes");
//! ```

/// Collapses repeated Unicode whitespace into single spaces and trims edges.
///
/// Returns an empty string for empty or whitespace-only input.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("green\n\nonions"), "green onions");
/// assert_eq!(collapse_whitespace("feta\u{00A0}cheese"), "feta cheese");
/// assert_eq!(collapse_whitespace(" \t "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(collapse_whitespace("olive \t oil\r\n"), "olive oil");
    }

    #[test]
    fn already_clean_text_is_unchanged() {
        assert_eq!(collapse_whitespace("brown rice"), "brown rice");
    }
}
