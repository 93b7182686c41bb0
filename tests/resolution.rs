use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pantry::{
    CanonicalIngredient, CountingMetrics, EnrichError, EnrichmentSource, Pantry,
    ResolutionCoordinator, ResolveConfig, StaticCatalog,
};

/// Answers from a fixed list but fails every lookup for one term.
struct FlakySource {
    inner: StaticCatalog,
    failing_term: &'static str,
}

#[async_trait]
impl EnrichmentSource for FlakySource {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        if query.starts_with(self.failing_term) {
            return Err(EnrichError::Transport {
                source_name: "flaky".into(),
                message: "connection reset".into(),
            });
        }
        Ok(self.inner.lookup(query, limit))
    }
}

/// Case-insensitive exact-name lookups only.
struct ExactCatalog {
    items: Vec<CanonicalIngredient>,
}

#[async_trait]
impl EnrichmentSource for ExactCatalog {
    fn name(&self) -> &str {
        "exact"
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.name.eq_ignore_ascii_case(query))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Sleeps before every answer.
struct SlowSource {
    delay: Duration,
}

#[async_trait]
impl EnrichmentSource for SlowSource {
    fn name(&self) -> &str {
        "slow"
    }

    async fn search(
        &self,
        query: &str,
        _limit: usize,
    ) -> Result<Vec<CanonicalIngredient>, EnrichError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![CanonicalIngredient::new(query, query)])
    }
}

fn produce() -> StaticCatalog {
    StaticCatalog::new(
        "produce",
        [
            CanonicalIngredient::new("01123", "Egg").with_category("Dairy & Eggs"),
            CanonicalIngredient::new("11529", "Tomato").with_category("Produce"),
            CanonicalIngredient::new("11282", "Onion").with_category("Produce"),
        ],
    )
}

fn coordinator(
    source: impl EnrichmentSource + 'static,
    metrics: Arc<CountingMetrics>,
) -> ResolutionCoordinator {
    let sources: Vec<Arc<dyn EnrichmentSource>> = vec![Arc::new(source)];
    ResolutionCoordinator::with_config(sources, ResolveConfig::default(), metrics)
        .expect("coordinator")
}

#[tokio::test]
async fn egg_and_eggs_collapse_to_one_record() {
    let metrics = Arc::new(CountingMetrics::new());
    let coordinator = coordinator(produce(), metrics.clone());

    let result = coordinator.resolve(["egg", "eggs"]).await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.ingredients[0].id.as_str(), "01123");
    assert_eq!(result.duplicates, 1);
    assert_eq!(metrics.duplicates(), 1);
    assert!(result.dropped.is_empty());
}

#[tokio::test]
async fn failing_term_does_not_block_the_batch() {
    let metrics = Arc::new(CountingMetrics::new());
    let source = FlakySource {
        inner: produce(),
        failing_term: "durian",
    };
    let coordinator = coordinator(source, metrics.clone());

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        coordinator.resolve(["tomato", "durian", "onions"]),
    )
    .await
    .expect("batch finished");

    let names: Vec<&str> = result.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Tomato", "Onion"]);
    assert_eq!(result.dropped, vec!["durian".to_string()]);
    assert_eq!(metrics.dropped_terms(), vec!["durian".to_string()]);
    assert_eq!(metrics.batches(), 1);
    assert_eq!(metrics.resolved(), 2);
}

#[tokio::test]
async fn unknown_terms_are_dropped_in_candidate_order() {
    let metrics = Arc::new(CountingMetrics::new());
    let coordinator = coordinator(produce(), metrics.clone());

    let result = coordinator.resolve(["yuzu", "tomato", "kohlrabi"]).await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.dropped, vec!["yuzu".to_string(), "kohlrabi".to_string()]);
    assert_eq!(metrics.dropped(), 2);
}

#[tokio::test(start_paused = true)]
async fn lookups_run_concurrently() {
    let coordinator = coordinator(
        SlowSource {
            delay: Duration::from_secs(1),
        },
        Arc::new(CountingMetrics::new()),
    );
    let terms: Vec<String> = (0..20).map(|i| format!("item{i}")).collect();

    let start = tokio::time::Instant::now();
    let result = coordinator.resolve(&terms).await;

    assert_eq!(result.len(), 20);
    assert!(start.elapsed() < Duration::from_secs(2));
    let ids: Vec<&str> = result.ids().map(|id| id.as_str()).collect();
    assert_eq!(ids[0], "item0");
    assert_eq!(ids[19], "item19");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_engine() {
    let pantry = Arc::new(
        Pantry::builder()
            .source(produce())
            .build()
            .expect("pantry"),
    );

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pantry = Arc::clone(&pantry);
        handles.push(tokio::spawn(async move {
            pantry.resolve(["tomato", "eggs", "onion"]).await
        }));
    }

    for handle in handles {
        let result = handle.await.expect("task");
        let ids: Vec<&str> = result.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["11529", "01123", "11282"]);
    }
}

#[tokio::test]
async fn identity_map_answers_when_sources_are_empty() {
    let empty = StaticCatalog::new("empty", Vec::<CanonicalIngredient>::new());
    let pantry = Pantry::builder().source(empty).build().expect("pantry");

    let result = pantry.resolve(["eggs"]).await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.ingredients[0].id.as_str(), pantry::EGG_FOOD_ID);
    assert_eq!(result.ingredients[0].name, "Egg");
    assert!(result.ingredients[0].category.is_none());
}

#[tokio::test]
async fn catalog_gets_fallback_variant_before_identity_map() {
    let catalog = ExactCatalog {
        items: vec![
            CanonicalIngredient::new("cat-egg", "eggs").with_category("Dairy & Eggs"),
            CanonicalIngredient::new("cat-apple", "apples")
                .with_category("Produce")
                .with_unit("each"),
        ],
    };
    let pantry = Pantry::builder().source(catalog).build().expect("pantry");
    assert_eq!(pantry.coordinator().source_names(), vec!["exact", "identity"]);

    let result = pantry.resolve(["egg", "apple"]).await;

    let ids: Vec<&str> = result.ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["cat-egg", "cat-apple"]);
    assert_eq!(result.ingredients[0].category.as_deref(), Some("Dairy & Eggs"));
    assert_eq!(result.ingredients[1].unit.as_deref(), Some("each"));
}

#[tokio::test]
async fn identity_map_still_answers_after_catalog_misses_both_forms() {
    let catalog = ExactCatalog {
        items: vec![CanonicalIngredient::new("cat-apple", "apples")],
    };
    let pantry = Pantry::builder().source(catalog).build().expect("pantry");

    let result = pantry.resolve(["eggs", "apple"]).await;

    let ids: Vec<&str> = result.ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec![pantry::EGG_FOOD_ID, "cat-apple"]);
}
