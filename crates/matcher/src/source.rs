//! Ordered resource providers for the vocabulary and identity tables.
//!
//! Both tables load the same way: try each provider in order, keep the first
//! one that reads and parses into a non-empty table, and fall back to a
//! literal compiled into the crate when every provider fails. Loading
//! therefore never fails; it only reports where the table came from.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SourceError;

/// Something that can produce the raw JSON body of a table.
pub trait ResourceProvider: Send + Sync + fmt::Debug {
    /// Human-readable location used in logs and [`SourceOrigin`].
    fn location(&self) -> String;

    fn read(&self) -> Result<String, SourceError>;
}

/// Reads a JSON file from disk.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResourceProvider for FileProvider {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<String, SourceError> {
        fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            location: self.location(),
            source,
        })
    }
}

/// A JSON body shipped inside the binary (`include_str!`) or handed over by
/// the caller.
#[derive(Debug, Clone)]
pub struct InlineProvider {
    label: String,
    body: String,
}

impl InlineProvider {
    pub fn new(label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            body: body.into(),
        }
    }
}

impl ResourceProvider for InlineProvider {
    fn location(&self) -> String {
        self.label.clone()
    }

    fn read(&self) -> Result<String, SourceError> {
        Ok(self.body.clone())
    }
}

/// Where a loaded table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum SourceOrigin {
    /// The named provider answered.
    Provider(String),
    /// Every provider failed; the literal table compiled into the crate is in use.
    Embedded,
    /// Built directly from caller-supplied entries.
    Inline,
}

impl SourceOrigin {
    pub fn is_embedded(&self) -> bool {
        matches!(self, SourceOrigin::Embedded)
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::Provider(location) => write!(f, "provider:{location}"),
            SourceOrigin::Embedded => f.write_str("embedded"),
            SourceOrigin::Inline => f.write_str("inline"),
        }
    }
}

/// Try `providers` in order; return the first parsed value and its origin.
///
/// `parse` receives the provider location and body and must reject empty
/// tables with [`SourceError::Empty`]. `None` means every provider failed and
/// the caller should use its embedded literal.
pub fn load_first<T, F>(
    table: &str,
    providers: &[Box<dyn ResourceProvider>],
    parse: F,
) -> Option<(T, SourceOrigin)>
where
    F: Fn(&str, &str) -> Result<T, SourceError>,
{
    let start = Instant::now();
    for provider in providers {
        let location = provider.location();
        let parsed = provider
            .read()
            .and_then(|body| parse(location.as_str(), body.as_str()));
        match parsed {
            Ok(value) => {
                debug!(
                    table,
                    location = %location,
                    elapsed_micros = start.elapsed().as_micros(),
                    "source_loaded"
                );
                return Some((value, SourceOrigin::Provider(location)));
            }
            Err(err) => {
                warn!(table, location = %location, error = %err, "source_fallthrough");
            }
        }
    }
    warn!(
        table,
        providers = providers.len(),
        "all sources failed; using embedded table"
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_list(location: &str, body: &str) -> Result<Vec<String>, SourceError> {
        let list: Vec<String> =
            serde_json::from_str(body).map_err(|source| SourceError::Parse {
                location: location.to_string(),
                source,
            })?;
        if list.is_empty() {
            return Err(SourceError::Empty {
                location: location.to_string(),
            });
        }
        Ok(list)
    }

    #[test]
    fn first_successful_provider_wins() {
        let providers: Vec<Box<dyn ResourceProvider>> = vec![
            Box::new(FileProvider::new("/definitely/not/here.json")),
            Box::new(InlineProvider::new("broken", "[1, 2")),
            Box::new(InlineProvider::new("empty", "[]")),
            Box::new(InlineProvider::new("good", r#"["kale"]"#)),
            Box::new(InlineProvider::new("later", r#"["leek"]"#)),
        ];
        let (list, origin) = load_first("test", &providers, parse_list).unwrap();
        assert_eq!(list, vec!["kale".to_string()]);
        assert_eq!(origin, SourceOrigin::Provider("good".into()));
    }

    #[test]
    fn all_failures_yield_none() {
        let providers: Vec<Box<dyn ResourceProvider>> =
            vec![Box::new(InlineProvider::new("broken", "{"))];
        assert!(load_first("test", &providers, parse_list).is_none());
        assert!(load_first("test", &[], parse_list).is_none());
    }

    #[test]
    fn file_provider_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        std::fs::write(&path, r#"["okra"]"#).unwrap();
        let provider = FileProvider::new(&path);
        assert_eq!(provider.read().unwrap(), r#"["okra"]"#);
        assert_eq!(provider.location(), path.display().to_string());
    }

    #[test]
    fn origin_display() {
        assert_eq!(SourceOrigin::Embedded.to_string(), "embedded");
        assert_eq!(
            SourceOrigin::Provider("a.json".into()).to_string(),
            "provider:a.json"
        );
        assert!(SourceOrigin::Embedded.is_embedded());
    }
}
