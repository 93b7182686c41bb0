use std::sync::Arc;

use async_trait::async_trait;

use crate::error::EnrichError;
use crate::types::CanonicalIngredient;

/// A catalog that can turn a normalized ingredient term into records.
///
/// Implementations must be cheap to call concurrently; the resolution layer
/// issues one call per candidate in parallel. An empty `Vec` means "no
/// results"; errors are logged by the caller and treated the same way.
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    /// Short name used in logs and metrics.
    fn name(&self) -> &str;

    /// At most `limit` records for `query`, best first.
    async fn search(&self, query: &str, limit: usize)
        -> Result<Vec<CanonicalIngredient>, EnrichError>;
}

#[async_trait]
impl<S> EnrichmentSource for Arc<S>
where
    S: EnrichmentSource + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        (**self).search(query, limit).await
    }
}
