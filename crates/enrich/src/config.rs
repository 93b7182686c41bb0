use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EnrichError;
use crate::retry::RetryConfig;

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Internal catalog endpoint (`GET {base_url}/search?query=..&limit=..`).
///
/// The client is disabled while `base_url` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
    /// Per-request timeout in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl CatalogConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }

    pub fn validate(&self) -> Result<(), EnrichError> {
        if let Some(url) = &self.base_url {
            validate_url("catalog", url)?;
        }
        validate_common("catalog", self.timeout, &self.retry)
    }
}

/// External food directory (`GET {base_url}?ingr=..&app_id=..&app_key=..`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub base_url: Option<String>,
    pub app_id: Option<String>,
    pub app_key: Option<String>,
    #[serde(with = "crate::serde_millis")]
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            app_id: None,
            app_key: None,
            timeout: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl DirectoryConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_credentials(mut self, app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self.app_key = Some(app_key.into());
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }

    pub fn validate(&self) -> Result<(), EnrichError> {
        if let Some(url) = &self.base_url {
            validate_url("directory", url)?;
            let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
            if blank(&self.app_id) || blank(&self.app_key) {
                return Err(EnrichError::InvalidConfig(
                    "directory requires app_id and app_key when base_url is set".into(),
                ));
            }
        }
        validate_common("directory", self.timeout, &self.retry)
    }
}

fn validate_url(name: &str, url: &str) -> Result<(), EnrichError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(EnrichError::InvalidConfig(format!(
            "{name} base_url must be an http(s) URL, got {url:?}"
        )))
    }
}

fn validate_common(name: &str, timeout: Duration, retry: &RetryConfig) -> Result<(), EnrichError> {
    if timeout.is_zero() {
        return Err(EnrichError::InvalidConfig(format!(
            "{name} timeout must be greater than zero"
        )));
    }
    retry
        .validate()
        .map_err(|msg| EnrichError::InvalidConfig(format!("{name} retry: {msg}")))
}
