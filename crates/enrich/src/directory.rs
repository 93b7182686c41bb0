//! Secondary enrichment source: an external food directory.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::DirectoryConfig;
use crate::error::EnrichError;
use crate::retry::{execute_with_retry_async, RetryConfig};
use crate::source::EnrichmentSource;
use crate::types::{CanonicalIngredient, FoodId};

const SOURCE_NAME: &str = "directory";

#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    hints: Vec<Hint>,
}

#[derive(Debug, Deserialize)]
struct Hint {
    food: DirectoryFood,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryFood {
    food_id: FoodId,
    label: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl From<DirectoryFood> for CanonicalIngredient {
    fn from(food: DirectoryFood) -> Self {
        CanonicalIngredient {
            id: food.food_id,
            name: food.label,
            category: food.category,
            image_url: food.image,
            unit: None,
            shelf_life_days: None,
        }
    }
}

/// HTTP client for `GET {base_url}?ingr=..&app_id=..&app_key=..`.
///
/// Only the first hint of a response is used, whatever `limit` asks for.
#[derive(Debug, Clone)]
pub struct FoodDirectoryClient {
    http: Client,
    base_url: String,
    app_id: String,
    app_key: String,
    retry: RetryConfig,
}

impl FoodDirectoryClient {
    pub fn new(cfg: &DirectoryConfig) -> Result<Self, EnrichError> {
        cfg.validate()?;
        let (Some(base_url), Some(app_id), Some(app_key)) =
            (cfg.base_url.as_deref(), cfg.app_id.as_deref(), cfg.app_key.as_deref())
        else {
            return Err(EnrichError::InvalidConfig(
                "directory base_url, app_id and app_key are required".into(),
            ));
        };
        let http = Client::builder()
            .timeout(cfg.timeout)
            .connect_timeout(cfg.timeout)
            .build()
            .map_err(|e| EnrichError::InvalidConfig(format!("directory http client: {e}")))?;
        Ok(Self::with_client(http, base_url, app_id, app_key, cfg.retry))
    }

    pub fn with_client(
        http: Client,
        base_url: &str,
        app_id: &str,
        app_key: &str,
        retry: RetryConfig,
    ) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            app_id: app_id.to_string(),
            app_key: app_key.to_string(),
            retry,
        }
    }

    async fn fetch_once(&self, query: &str) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("ingr", query),
                ("app_id", self.app_id.as_str()),
                ("app_key", self.app_key.as_str()),
            ])
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
        let parsed: DirectoryResponse =
            serde_json::from_slice(&body).map_err(|e| EnrichError::decode(SOURCE_NAME, e))?;

        Ok(parsed
            .hints
            .into_iter()
            .next()
            .map(|hint| CanonicalIngredient::from(hint.food))
            .into_iter()
            .collect())
    }
}

#[async_trait]
impl EnrichmentSource for FoodDirectoryClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let outcome = execute_with_retry_async(&self.retry, EnrichError::is_retryable, |attempt| {
            if attempt > 0 {
                warn!(source = SOURCE_NAME, query, attempt, "enrich_retry");
            }
            self.fetch_once(query)
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
