//! Pantry canonical text layer.
//!
//! Every piece of ingredient text (an OCR line from a receipt, a product
//! label from a barcode lookup, a search box query) passes through here before
//! it is compared against the vocabulary.
//!
//! ## What we do
//!
//! - Trim and lowercase, collapsing interior whitespace ([`normalize`])
//! - Optional NFKC folding for ligature-heavy OCR output
//! - Strip one descriptor prefix such as `"fresh "` or `"diced "` ([`strip_filler`])
//! - Suffix-based singular/plural heuristics ([`singularize`], [`pluralize`])
//! - Word splitting for n-gram windows ([`words`], [`word_tokens`])
//!
//! ## What we don't do
//!
//! Real English morphology. `"tomatoes"` singularizes to `"tomatoe"` and
//! `"mice"` stays `"mice"`. Callers that need the `-es` form use
//! [`singular_variants`].
//!
//! No I/O, no clock calls, no locale dependence: same text in, same term out.

mod config;
mod error;
mod normalize;
mod token;
mod whitespace;

pub use crate::config::{NormalizeConfig, DEFAULT_FILLER_PREFIXES};
pub use crate::error::CanonicalError;
pub use crate::normalize::{
    normalize, pluralize, singular_variants, singularize, strip_filler, NormalizedTerm,
    Normalizer,
};
pub use crate::token::{trim_punctuation, word_tokens, words};
pub use crate::whitespace::collapse_whitespace;
