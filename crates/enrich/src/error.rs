use thiserror::Error;

/// Errors surfaced by enrichment sources.
///
/// The resolution layer treats every variant as "no result" for the term; the
/// distinction matters for transport retry and for logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichError {
    /// Configuration is inconsistent (missing base URL, missing credentials).
    #[error("invalid enrichment config: {0}")]
    InvalidConfig(String),
    /// Connection, DNS or timeout failure before a response arrived.
    #[error("transport failure for {source_name}: {message}")]
    Transport { source_name: String, message: String },
    /// The upstream answered with a non-success status.
    #[error("{source_name} returned HTTP {status}")]
    Status { source_name: String, status: u16 },
    /// The body did not have the expected shape.
    #[error("could not decode {source_name} response: {message}")]
    Decode { source_name: String, message: String },
}

impl EnrichError {
    pub(crate) fn transport(source_name: &str, err: reqwest::Error) -> Self {
        EnrichError::Transport {
            source_name: source_name.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(source_name: &str, err: impl std::fmt::Display) -> Self {
        EnrichError::Decode {
            source_name: source_name.to_string(),
            message: err.to_string(),
        }
    }

    /// Transient failures worth another attempt: transport errors, 429 and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            EnrichError::Transport { .. } => true,
            EnrichError::Status { status, .. } => *status == 429 || *status >= 500,
            EnrichError::InvalidConfig(_) | EnrichError::Decode { .. } => false,
        }
    }
}
