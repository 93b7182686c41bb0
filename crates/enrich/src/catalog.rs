//! Primary enrichment source: the internal ingredient catalog.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::error::EnrichError;
use crate::retry::{execute_with_retry_async, RetryConfig};
use crate::source::EnrichmentSource;
use crate::types::CanonicalIngredient;

const SOURCE_NAME: &str = "catalog";

/// HTTP client for `GET {base_url}/search?query=..&limit=..`.
///
/// The catalog answers with a JSON array of ingredient records. An empty
/// body, or a two-byte body such as `[]`, means "no results".
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    search_url: String,
    retry: RetryConfig,
}

impl CatalogClient {
    pub fn new(cfg: &CatalogConfig) -> Result<Self, EnrichError> {
        cfg.validate()?;
        let base_url = cfg
            .base_url
            .as_deref()
            .ok_or_else(|| EnrichError::InvalidConfig("catalog base_url is not set".into()))?;
        let http = Client::builder()
            .timeout(cfg.timeout)
            .connect_timeout(cfg.timeout)
            .build()
            .map_err(|e| EnrichError::InvalidConfig(format!("catalog http client: {e}")))?;
        Ok(Self::with_client(http, base_url, cfg.retry))
    }

    /// Use a caller-built `reqwest::Client` (shared pools, proxies, tests).
    pub fn with_client(http: Client, base_url: &str, retry: RetryConfig) -> Self {
        Self {
            http,
            search_url: format!("{}/search", base_url.trim_end_matches('/')),
            retry,
        }
    }

    async fn fetch_once(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        let limit_param = limit.to_string();
        let response = self
            .http
            .get(&self.search_url)
            .query(&[("query", query), ("limit", limit_param.as_str())])
            .send()
            .await
            .map_err(|e| EnrichError::transport(SOURCE_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Status {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| EnrichError::transport(SOURCE_NAME, e))?;
        if body.len() <= 2 {
            return Ok(Vec::new());
        }

        let mut items: Vec<CanonicalIngredient> =
            serde_json::from_slice(&body).map_err(|e| EnrichError::decode(SOURCE_NAME, e))?;
        items.truncate(limit);
        Ok(items)
    }
}

#[async_trait]
impl EnrichmentSource for CatalogClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        let start = Instant::now();
        let outcome = execute_with_retry_async(&self.retry, EnrichError::is_retryable, |attempt| {
            if attempt > 0 {
                warn!(source = SOURCE_NAME, query, attempt, "enrich_retry");
            }
            self.fetch_once(query, limit)
        })
        .await;

        let elapsed_micros = start.elapsed().as_micros() as u64;
        match &outcome.result {
            Ok(items) => debug!(
                source = SOURCE_NAME,
                query,
                results = items.len(),
                attempts = outcome.attempts,
                elapsed_micros,
                "enrich_lookup"
            ),
            Err(err) => warn!(
                source = SOURCE_NAME,
                query,
                attempts = outcome.attempts,
                elapsed_micros,
                error = %err,
                "enrich_lookup_failed"
            ),
        }
        outcome.into_result()
    }
}
