//! The [`Pantry`] facade: one object owning the normalizer, the vocabulary
//! matcher, the identity map and the resolution coordinator.

use std::fs;
use std::sync::Arc;
use std::time::Instant;

use canonical::{NormalizeConfig, Normalizer};
use enrich::{
    CanonicalIngredient, CatalogClient, EnrichmentSource, FoodDirectoryClient, StaticCatalog,
};
use matcher::{
    CandidateGenerator, CandidateMatch, FileProvider, IngredientIdentityMap, MatcherConfig,
    RawToken, ResourceProvider, ScanSession, Vocabulary, VocabularyMatcher,
};
use tracing::{debug, info};

use crate::config::{ConfigLoadError, PantryConfig, TableSources};
use crate::coordinator::{ResolutionCoordinator, ResolutionResult, ResolveConfig};
use crate::error::EngineError;
use crate::identity_source::IdentityMapSource;
use crate::input::{ProcessOutcome, ScanInput};
use crate::metrics::{NoopMetrics, ResolutionMetrics};
use crate::ranker::{ScannedProduct, SearchItem, rank};

const OFFLINE_CATALOG_NAME: &str = "offline";

/// Where a lookup table comes from when the builder runs.
enum TableChoice<T> {
    Ready(T),
    Providers {
        providers: Vec<Box<dyn ResourceProvider>>,
        use_packaged: bool,
    },
}

impl<T> Default for TableChoice<T> {
    fn default() -> Self {
        TableChoice::Providers {
            providers: Vec::new(),
            use_packaged: true,
        }
    }
}

impl<T> TableChoice<T> {
    fn from_sources(sources: &TableSources) -> Self {
        let providers = sources
            .sources
            .iter()
            .map(|path| Box::new(FileProvider::new(path)) as Box<dyn ResourceProvider>)
            .collect();
        TableChoice::Providers {
            providers,
            use_packaged: sources.use_packaged,
        }
    }

    fn push_provider(&mut self, provider: Box<dyn ResourceProvider>) {
        match self {
            TableChoice::Providers { providers, .. } => providers.push(provider),
            TableChoice::Ready(_) => {
                *self = TableChoice::Providers {
                    providers: vec![provider],
                    use_packaged: true,
                };
            }
        }
    }

    fn resolve(
        self,
        load: fn(&[Box<dyn ResourceProvider>]) -> T,
        load_with_defaults: fn(Vec<Box<dyn ResourceProvider>>) -> T,
    ) -> T {
        match self {
            TableChoice::Ready(table) => table,
            TableChoice::Providers {
                providers,
                use_packaged: true,
            } => load_with_defaults(providers),
            TableChoice::Providers {
                providers,
                use_packaged: false,
            } => load(&providers),
        }
    }
}

/// Assembles a [`Pantry`] from explicit parts or a [`PantryConfig`].
///
/// Sources are queried in the order they are added. With
/// [`ResolveConfig::identity_fallback`] set (the default) the identity map
/// answers only after every added source came back empty for both a term and
/// its fallback variant.
#[derive(Default)]
pub struct PantryBuilder {
    normalize: NormalizeConfig,
    matcher: MatcherConfig,
    resolve: ResolveConfig,
    vocabulary: TableChoice<Vocabulary>,
    identity: TableChoice<IngredientIdentityMap>,
    sources: Vec<Arc<dyn EnrichmentSource>>,
    metrics: Option<Arc<dyn ResolutionMetrics>>,
}

impl PantryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder populated from a loaded configuration.
    ///
    /// HTTP clients are created for every enabled endpoint, followed by the
    /// offline catalog file when one is configured.
    pub fn from_config(cfg: &PantryConfig) -> Result<Self, EngineError> {
        cfg.validate()?;
        let mut builder = Self {
            normalize: cfg.normalize.clone(),
            matcher: cfg.matcher.clone(),
            resolve: cfg.resolve.clone(),
            vocabulary: TableChoice::from_sources(&cfg.vocabulary),
            identity: TableChoice::from_sources(&cfg.identity),
            sources: Vec::new(),
            metrics: None,
        };

        if cfg.catalog.is_enabled() {
            builder = builder.source(CatalogClient::new(&cfg.catalog)?);
        }
        if cfg.directory.is_enabled() {
            builder = builder.source(FoodDirectoryClient::new(&cfg.directory)?);
        }
        if let Some(path) = &cfg.offline_catalog {
            let body = fs::read_to_string(path).map_err(ConfigLoadError::from)?;
            let catalog = StaticCatalog::from_json(OFFLINE_CATALOG_NAME, &body)?;
            info!(
                path = %path.display(),
                items = catalog.len(),
                "offline_catalog_loaded"
            );
            builder = builder.source(catalog);
        }
        Ok(builder)
    }

    pub fn vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = TableChoice::Ready(vocabulary);
        self
    }

    /// Add a vocabulary location, tried before the packaged defaults.
    pub fn vocabulary_provider(mut self, provider: impl ResourceProvider + 'static) -> Self {
        self.vocabulary.push_provider(Box::new(provider));
        self
    }

    pub fn identity_map(mut self, map: IngredientIdentityMap) -> Self {
        self.identity = TableChoice::Ready(map);
        self
    }

    /// Add an identity-map location, tried before the packaged defaults.
    pub fn identity_provider(mut self, provider: impl ResourceProvider + 'static) -> Self {
        self.identity.push_provider(Box::new(provider));
        self
    }

    pub fn source(self, source: impl EnrichmentSource + 'static) -> Self {
        self.shared_source(Arc::new(source))
    }

    pub fn shared_source(mut self, source: Arc<dyn EnrichmentSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn identity_fallback(mut self, enabled: bool) -> Self {
        self.resolve.identity_fallback = enabled;
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn ResolutionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn resolve_config(mut self, cfg: ResolveConfig) -> Self {
        self.resolve = cfg;
        self
    }

    pub fn normalize_config(mut self, cfg: NormalizeConfig) -> Self {
        self.normalize = cfg;
        self
    }

    pub fn matcher_config(mut self, cfg: MatcherConfig) -> Self {
        self.matcher = cfg;
        self
    }

    /// Load the tables and wire the coordinator.
    ///
    /// Fails with [`EngineError::NoEnrichmentSource`] when no source was added
    /// and the identity fallback is off.
    pub fn build(self) -> Result<Pantry, EngineError> {
        let start = Instant::now();
        let normalizer = Normalizer::new(self.normalize)?;
        let vocabulary = self
            .vocabulary
            .resolve(Vocabulary::load, Vocabulary::load_with_defaults);
        let matcher = VocabularyMatcher::with_config(vocabulary, self.matcher)?;
        let identity = Arc::new(self.identity.resolve(
            IngredientIdentityMap::load,
            IngredientIdentityMap::load_with_defaults,
        ));

        let mut terminal: Vec<Arc<dyn EnrichmentSource>> = Vec::new();
        if self.resolve.identity_fallback {
            terminal.push(Arc::new(IdentityMapSource::new(Arc::clone(&identity))));
        }
        let metrics = self.metrics.unwrap_or_else(|| Arc::new(NoopMetrics));
        let coordinator =
            ResolutionCoordinator::with_tiers(self.sources, terminal, self.resolve, metrics)?;

        info!(
            vocabulary = matcher.vocabulary().len(),
            identity = identity.len(),
            sources = ?coordinator.source_names(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "pantry_ready"
        );

        Ok(Pantry {
            normalizer,
            matcher,
            identity,
            coordinator,
        })
    }
}

/// Recognition and resolution over one vocabulary and one set of sources.
///
/// Safe to share across tasks; concurrent [`resolve`](Self::resolve) calls
/// are serialized per instance.
#[derive(Debug)]
pub struct Pantry {
    normalizer: Normalizer,
    matcher: VocabularyMatcher,
    identity: Arc<IngredientIdentityMap>,
    coordinator: ResolutionCoordinator,
}

impl Pantry {
    pub fn builder() -> PantryBuilder {
        PantryBuilder::new()
    }

    pub fn from_config(cfg: &PantryConfig) -> Result<Self, EngineError> {
        PantryBuilder::from_config(cfg)?.build()
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn matcher(&self) -> &VocabularyMatcher {
        &self.matcher
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.matcher.vocabulary()
    }

    pub fn identity_map(&self) -> &IngredientIdentityMap {
        &self.identity
    }

    pub fn coordinator(&self) -> &ResolutionCoordinator {
        &self.coordinator
    }

    /// Vocabulary matches on `line` not yet seen in `session`.
    pub fn scan_line(&self, line: &RawToken, session: &mut ScanSession) -> Vec<CandidateMatch> {
        CandidateGenerator::new(&self.matcher).generate(line, session)
    }

    pub async fn resolve<I, S>(&self, candidates: I) -> ResolutionResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.coordinator.resolve(candidates).await
    }

    /// Resolve the vocabulary entries behind `matches`.
    pub async fn resolve_matches(&self, matches: &[CandidateMatch]) -> ResolutionResult {
        self.coordinator
            .resolve(matches.iter().map(|found| found.entry.as_str()))
            .await
    }

    /// Catalog results for a typed query, most relevant first.
    pub async fn search(&self, query: &str) -> Vec<CanonicalIngredient> {
        self.search_result(query).await.ingredients
    }

    /// Catalog results and caller-scanned products ranked as one list.
    ///
    /// Scanned products without an ingredient get one resolved from their
    /// label first.
    pub async fn search_with_scanned(
        &self,
        query: &str,
        scanned: Vec<ScannedProduct>,
    ) -> Vec<SearchItem> {
        let mut items: Vec<SearchItem> = self
            .search(query)
            .await
            .into_iter()
            .map(SearchItem::Catalog)
            .collect();
        for mut product in scanned {
            if product.ingredient.is_none() {
                product.ingredient = self.resolve_product_label(&product.label).await;
            }
            items.push(SearchItem::Scanned(product));
        }
        rank(items, self.normalizer.clean(query).as_str())
    }

    /// Resolve a barcode product name through the fuzzy matcher.
    pub async fn resolve_product_label(&self, label: &str) -> Option<CanonicalIngredient> {
        let found = self.match_label(label)?;
        self.coordinator
            .resolve([found.entry.as_str()])
            .await
            .ingredients
            .into_iter()
            .next()
    }

    /// Dispatch any supported input.
    pub async fn process(&self, input: ScanInput, session: &mut ScanSession) -> ProcessOutcome {
        debug!(kind = input.kind(), "process_input");
        match input {
            ScanInput::OcrLine(line) => {
                let matches = self.scan_line(&line, session);
                let result = self.resolve_matches(&matches).await;
                ProcessOutcome {
                    matches,
                    ingredients: result.ingredients,
                    dropped: result.dropped,
                }
            }
            ScanInput::ProductLabel(label) => {
                let matches: Vec<CandidateMatch> = self.match_label(&label).into_iter().collect();
                let result = self.resolve_matches(&matches).await;
                ProcessOutcome {
                    matches,
                    ingredients: result.ingredients,
                    dropped: result.dropped,
                }
            }
            ScanInput::Search(query) => {
                let result = self.search_result(&query).await;
                ProcessOutcome {
                    matches: Vec::new(),
                    ingredients: result.ingredients,
                    dropped: result.dropped,
                }
            }
        }
    }

    /// Whole label first, then its phrases and words in candidate order.
    fn match_label(&self, label: &str) -> Option<CandidateMatch> {
        let cleaned = self.normalizer.clean(label);
        if cleaned.is_empty() {
            return None;
        }
        let line = RawToken::new(cleaned.as_str(), 0);
        CandidateGenerator::new(&self.matcher)
            .candidates(&line)
            .iter()
            .find_map(|candidate| self.matcher.match_fuzzy(candidate))
    }

    async fn search_result(&self, query: &str) -> ResolutionResult {
        let cleaned = self.normalizer.clean(query);
        if cleaned.is_empty() {
            return ResolutionResult::default();
        }

        let mut terms = vec![cleaned.as_str().to_string()];
        if let Some(found) = self.matcher.match_term(cleaned.as_str()) {
            terms.push(found.entry);
        }
        let suggestions = self.matcher.suggestions(cleaned.as_str());
        debug!(
            query = cleaned.as_str(),
            suggestions = suggestions.len(),
            "search_terms"
        );
        terms.extend(suggestions);

        let mut result = self.coordinator.resolve(terms).await;
        result.ingredients = rank(result.ingredients, cleaned.as_str());
        result
    }
}
