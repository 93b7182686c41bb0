//! # Pantry Enrichment (`enrich`)
//!
//! Sources that turn a matched ingredient term into [`CanonicalIngredient`]
//! records:
//!
//! - [`CatalogClient`]: the internal catalog (`GET {base}/search`), primary.
//! - [`FoodDirectoryClient`]: an external food directory, secondary; first
//!   hint only.
//! - [`StaticCatalog`]: in-memory catalog for offline use and tests.
//!
//! All of them implement the async [`EnrichmentSource`] trait. HTTP clients
//! retry transient transport failures (timeouts, 429, 5xx) with exponential
//! backoff via [`retry`]; anything that still fails is returned as an
//! [`EnrichError`] for the caller to log and treat as "no result".
//!
//! ```no_run
//! use enrich::{CatalogClient, CatalogConfig, EnrichmentSource};
//!
//! # async fn demo() -> Result<(), enrich::EnrichError> {
//! let client = CatalogClient::new(
//!     &CatalogConfig::default().with_base_url("http://catalog.internal"),
//! )?;
//! let hits = client.search("tomato", 1).await?;
//! println!("{hits:?}");
//! # Ok(())
//! # }
//! ```

mod cache;
mod catalog;
mod config;
mod directory;
mod error;
pub mod retry;
mod serde_millis;
mod source;
mod stub;
mod types;

pub use crate::cache::QueryCache;
pub use crate::catalog::CatalogClient;
pub use crate::config::{CatalogConfig, DirectoryConfig};
pub use crate::directory::FoodDirectoryClient;
pub use crate::error::EnrichError;
pub use crate::retry::{RetryConfig, RetryOutcome};
pub use crate::source::EnrichmentSource;
pub use crate::stub::StaticCatalog;
pub use crate::types::{CanonicalIngredient, FoodId};
