//! YAML configuration for the pantry engine.
//!
//! One file describes every stage: where the vocabulary and identity tables
//! come from, how text is normalized, matcher tuning, the enrichment
//! endpoints and resolution behavior. Every section is optional.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "store-app"
//!
//! vocabulary:
//!   sources: ["/etc/pantry/vocabulary.json"]
//!
//! identity:
//!   sources: ["/etc/pantry/identity.json"]
//!   use_packaged: true
//!
//! normalize:
//!   version: 1
//!   normalize_unicode: true
//!
//! matcher:
//!   min_fuzzy_len: 3
//!   max_suggestions: 8
//!
//! catalog:
//!   base_url: "https://catalog.internal"
//!   timeout: 3000
//!   retry:
//!     max_retries: 2
//!     base_delay: 100
//!
//! directory:
//!   base_url: "https://api.food-directory.example/parser"
//!   app_id: "my-app"
//!   app_key: "secret"
//!
//! offline_catalog: "/etc/pantry/catalog.json"
//!
//! resolve:
//!   lookup_limit: 1
//!   cache_enabled: true
//!   identity_fallback: true
//! ```
//!
//! ## Environment overrides
//!
//! Applied by [`PantryConfig::apply_env_overrides`] after loading:
//! `PANTRY_CATALOG_URL`, `PANTRY_DIRECTORY_URL`, `PANTRY_DIRECTORY_APP_ID`,
//! `PANTRY_DIRECTORY_APP_KEY`. Entries under `env_overrides:` in the file use
//! the same keys and are applied first, so real environment variables win.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use canonical::NormalizeConfig;
use enrich::{CatalogConfig, DirectoryConfig};
use matcher::MatcherConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coordinator::ResolveConfig;

pub const ENV_CATALOG_URL: &str = "PANTRY_CATALOG_URL";
pub const ENV_DIRECTORY_URL: &str = "PANTRY_DIRECTORY_URL";
pub const ENV_DIRECTORY_APP_ID: &str = "PANTRY_DIRECTORY_APP_ID";
pub const ENV_DIRECTORY_APP_KEY: &str = "PANTRY_DIRECTORY_APP_KEY";

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Ordered file locations for a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSources {
    /// Tried in order before anything packaged with the binary.
    pub sources: Vec<PathBuf>,
    /// Try the JSON packaged with the crate before the embedded literal.
    pub use_packaged: bool,
}

impl Default for TableSources {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            use_packaged: true,
        }
    }
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub vocabulary: TableSources,

    #[serde(default)]
    pub identity: TableSources,

    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub matcher: MatcherConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub directory: DirectoryConfig,

    /// JSON array in catalog format, served by an in-memory source.
    #[serde(default)]
    pub offline_catalog: Option<PathBuf>,

    #[serde(default)]
    pub resolve: ResolveConfig,

    /// Same keys as the environment overrides.
    #[serde(default)]
    pub env_overrides: HashMap<String, String>,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            vocabulary: TableSources::default(),
            identity: TableSources::default(),
            normalize: NormalizeConfig::default(),
            matcher: MatcherConfig::default(),
            catalog: CatalogConfig::default(),
            directory: DirectoryConfig::default(),
            offline_catalog: None,
            resolve: ResolveConfig::default(),
            env_overrides: HashMap::new(),
        }
    }
}

impl PantryConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PantryConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `env_overrides` from the file, then the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigLoadError> {
        let from_file = self.env_overrides.clone();
        self.apply_overrides(|key| from_file.get(key).cloned())?;
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup, then re-validate.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = value(ENV_CATALOG_URL) {
            self.catalog.base_url = Some(url);
        }
        if let Some(url) = value(ENV_DIRECTORY_URL) {
            self.directory.base_url = Some(url);
        }
        if let Some(app_id) = value(ENV_DIRECTORY_APP_ID) {
            self.directory.app_id = Some(app_id);
        }
        if let Some(app_key) = value(ENV_DIRECTORY_APP_KEY) {
            self.directory.app_key = Some(app_key);
        }
        self.validate()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        let stage = |name: &str, err: String| ConfigLoadError::Validation(format!("{name}: {err}"));
        self.normalize
            .validate()
            .map_err(|e| stage("normalize", e.to_string()))?;
        self.matcher
            .validate()
            .map_err(|e| stage("matcher", e.to_string()))?;
        self.catalog
            .validate()
            .map_err(|e| stage("catalog", e.to_string()))?;
        self.directory
            .validate()
            .map_err(|e| stage("directory", e.to_string()))?;
        self.resolve
            .validate()
            .map_err(|e| stage("resolve", e.to_string()))?;
        Ok(())
    }
}
