use enrich::CanonicalIngredient;
use matcher::{CandidateMatch, RawToken};
use serde::Serialize;

/// Every kind of text the engine accepts, resolved once at the call boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanInput {
    /// One recognized line from on-device OCR.
    OcrLine(RawToken),
    /// Product name returned by a barcode lookup.
    ProductLabel(String),
    /// Text typed into the search box.
    Search(String),
}

impl ScanInput {
    pub fn ocr_line(text: impl Into<String>, line_index: usize) -> Self {
        ScanInput::OcrLine(RawToken::new(text, line_index))
    }

    pub fn product_label(label: impl Into<String>) -> Self {
        ScanInput::ProductLabel(label.into())
    }

    pub fn search(query: impl Into<String>) -> Self {
        ScanInput::Search(query.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScanInput::OcrLine(_) => "ocr_line",
            ScanInput::ProductLabel(_) => "product_label",
            ScanInput::Search(_) => "search",
        }
    }
}

/// What [`Pantry::process`](crate::Pantry::process) produced for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    /// Vocabulary matches found in the input (empty for searches).
    pub matches: Vec<CandidateMatch>,
    /// Resolved records; ranked when the input was a search.
    pub ingredients: Vec<CanonicalIngredient>,
    /// Terms no enrichment source could resolve.
    pub dropped: Vec<String>,
}
