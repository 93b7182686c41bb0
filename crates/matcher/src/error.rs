use std::io;

use thiserror::Error;

/// Errors produced when configuring the matching layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatcherError {
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
}

/// A single resource provider failed to yield a usable table.
///
/// These never escape a load: the chain logs them and moves on to the next
/// provider, ending at the embedded literal table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{location} contained no usable entries")]
    Empty { location: String },
}
