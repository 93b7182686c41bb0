//! HTTP clients against a mock server.

use std::time::Duration;

use enrich::{
    CatalogClient, CatalogConfig, DirectoryConfig, EnrichError, EnrichmentSource,
    FoodDirectoryClient, FoodId, RetryConfig,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_retry() -> RetryConfig {
    RetryConfig::default()
        .with_max_retries(2)
        .with_base_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(5))
        .with_jitter(false)
}

fn catalog(server: &MockServer, retry: RetryConfig) -> CatalogClient {
    let cfg = CatalogConfig {
        base_url: Some(server.uri()),
        timeout: Duration::from_millis(300),
        retry,
    };
    CatalogClient::new(&cfg).expect("catalog client")
}

#[tokio::test]
async fn catalog_search_decodes_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "tomato"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "11529",
            "category": "Vegetables",
            "name": "Tomato",
            "unit": "pcs",
            "shelfLifeDays": 7,
            "imageURL": "https://img.example/tomato.png"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let hits = catalog(&server, quick_retry()).search("tomato", 1).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, FoodId::new("11529"));
    assert_eq!(hits[0].category.as_deref(), Some("Vegetables"));
    assert_eq!(hits[0].shelf_life_days, Some(7));
}

#[tokio::test]
async fn catalog_empty_and_two_byte_bodies_mean_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("query", "nothing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("query", "still-nothing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = catalog(&server, quick_retry());
    assert!(client.search("nothing", 1).await.unwrap().is_empty());
    assert!(client.search("still-nothing", 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn catalog_retries_transient_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Milk"}])),
        )
        .mount(&server)
        .await;

    let hits = catalog(&server, quick_retry()).search("milk", 1).await.unwrap();
    assert_eq!(hits[0].name, "Milk");
}

#[tokio::test]
async fn catalog_does_not_retry_client_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = catalog(&server, quick_retry()).search("milk", 1).await.unwrap_err();
    assert!(matches!(err, EnrichError::Status { status: 404, .. }));
}

#[tokio::test]
async fn catalog_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"oops\": true}"))
        .mount(&server)
        .await;

    let err = catalog(&server, quick_retry()).search("milk", 1).await.unwrap_err();
    assert!(matches!(err, EnrichError::Decode { .. }));
}

#[tokio::test]
async fn catalog_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = catalog(&server, RetryConfig::disabled())
        .search("slow", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, EnrichError::Transport { .. }));
}

#[tokio::test]
async fn directory_uses_first_hint_and_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("ingr", "apple"))
        .and(query_param("app_id", "demo-id"))
        .and(query_param("app_key", "demo-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "apple",
            "hints": [
                {"food": {"foodId": "food_apple", "label": "Apple", "image": "https://img/apple.jpg"}},
                {"food": {"foodId": "food_juice", "label": "Apple Juice", "category": "Drinks"}}
            ]
        })))
        .mount(&server)
        .await;

    let cfg = DirectoryConfig {
        base_url: Some(server.uri()),
        timeout: Duration::from_millis(300),
        retry: quick_retry(),
        ..Default::default()
    }
    .with_credentials("demo-id", "demo-key");
    let client = FoodDirectoryClient::new(&cfg).unwrap();

    let hits = client.search("apple", 5).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, FoodId::new("food_apple"));
    assert_eq!(hits[0].category, None);
    assert_eq!(client.name(), "directory");
}

#[tokio::test]
async fn directory_without_hints_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hints": []})))
        .mount(&server)
        .await;

    let cfg = DirectoryConfig::default()
        .with_base_url(server.uri())
        .with_credentials("id", "key");
    let hits = FoodDirectoryClient::new(&cfg)
        .unwrap()
        .search("unobtainium", 1)
        .await
        .unwrap();
    assert!(hits.is_empty());
}
