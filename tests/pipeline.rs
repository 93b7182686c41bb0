use std::io::Write;
use std::sync::Arc;

use pantry::{
    CandidateGenerator, CountingMetrics, MatchKind, Pantry, PantryBuilder, PantryConfig,
    RawToken, ScanInput, ScanSession, Vocabulary, VocabularyMatcher, normalize,
};
use tempfile::NamedTempFile;

const CATALOG_JSON: &str = r#"[
  {"id": "11529", "name": "Tomato", "category": "Produce", "unit": "each", "shelfLifeDays": 7},
  {"id": 1123, "name": "Egg", "category": "Dairy & Eggs", "imageURL": "https://img.example/egg.png"},
  {"id": "20044", "name": "Rice", "category": "Grains"}
]"#;

fn write_temp(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn normalize_is_idempotent() {
    for input in ["  Large   TOMATOES ", "Crème Fraîche", "", "egg\t\tyolk"] {
        let once = normalize(input);
        assert_eq!(normalize(once.as_str()), once);
    }
}

#[test]
fn plural_line_matches_singular_vocabulary() {
    let matcher = VocabularyMatcher::new(Vocabulary::from_entries(["tomato"]));
    let found = matcher.match_term("tomatoes").unwrap();
    assert_eq!(found.entry, "tomato");
    assert!(matches!(found.kind, MatchKind::Singular | MatchKind::Plural));
}

#[test]
fn large_tomatoes_matches_only_tomatoes() {
    let matcher = VocabularyMatcher::new(Vocabulary::from_entries(["tomatoes"]));
    let generator = CandidateGenerator::new(&matcher);
    let line = RawToken::new("large tomatoes", 0);

    let candidates = generator.candidates(&line);
    for expected in ["large tomatoes", "large", "tomatoes"] {
        assert!(candidates.iter().any(|c| c == expected), "missing {expected}");
    }

    let mut session = ScanSession::new();
    let matches = generator.generate(&line, &mut session);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].term, "tomatoes");
    assert_eq!(matches[0].kind, MatchKind::Exact);
}

#[tokio::test]
async fn receipt_lines_resolve_end_to_end() {
    let catalog = write_temp(CATALOG_JSON);
    let yaml = format!(
        "version: \"1.0\"\noffline_catalog: \"{}\"\nresolve:\n  identity_fallback: false\n",
        catalog.path().display()
    );
    let config = PantryConfig::from_yaml(&yaml).unwrap();
    let metrics = Arc::new(CountingMetrics::new());
    let pantry = PantryBuilder::from_config(&config)
        .unwrap()
        .metrics(metrics.clone())
        .build()
        .unwrap();
    assert_eq!(pantry.coordinator().source_names(), vec!["offline"]);

    let mut session = ScanSession::new();
    let mut resolved = Vec::new();
    for (index, line) in ["ROMA TOMATOES 2.99", "EGGS LARGE 12CT", "PAPRIKA", "eggs"]
        .into_iter()
        .enumerate()
    {
        let outcome = pantry
            .process(ScanInput::ocr_line(line, index), &mut session)
            .await;
        resolved.extend(outcome.ingredients);
    }

    let ids: Vec<&str> = resolved.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["11529", "1123"]);
    assert_eq!(resolved[0].shelf_life_days, Some(7));
    assert_eq!(
        resolved[1].image_url.as_deref(),
        Some("https://img.example/egg.png")
    );
    assert!(metrics.dropped_terms().iter().any(|term| term == "paprika"));
}

#[tokio::test]
async fn search_input_returns_ranked_records() {
    let catalog = write_temp(CATALOG_JSON);
    let mut config = PantryConfig::default();
    config.offline_catalog = Some(catalog.path().to_path_buf());

    let pantry = Pantry::from_config(&config).unwrap();
    let mut session = ScanSession::new();
    let outcome = pantry
        .process(ScanInput::search("Fresh Tomatoes"), &mut session)
        .await;

    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.ingredients[0].name, "Tomato");
    assert!(session.is_empty());
}

#[test]
fn missing_offline_catalog_is_a_config_error() {
    let mut config = PantryConfig::default();
    config.offline_catalog = Some("/nonexistent/catalog.json".into());
    let err = PantryBuilder::from_config(&config).err().unwrap();
    assert!(matches!(err, pantry::EngineError::Config(_)));
}
