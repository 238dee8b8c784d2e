//! Tests for endpoint definitions and the HTTP page source

use super::*;
use crate::fetcher::{FetchOptions, PageQuery, PageSource, PagedFetcher};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// YAML loading and validation
// ============================================================================

const MINIMAL_YAML: &str = r"
kind: endpoint
name: executions
url: https://api.example.com/v1/executions
";

#[test]
fn test_load_minimal_endpoint_applies_defaults() {
    let config = load_endpoint_from_str(MINIMAL_YAML).unwrap();

    assert_eq!(config.name, "executions");
    assert_eq!(config.method, crate::types::Method::GET);
    assert!(config.query.is_empty());
    assert_eq!(config.page.items_path, None);
    assert_eq!(config.page.token_path, "next_token");
    assert_eq!(config.page.token_param, "next_token");
    assert_eq!(config.page.token_placement, TokenPlacement::Query);
    assert_eq!(config.page.max_size, 100);
    assert_eq!(config.http.timeout_secs, 30);
    assert_eq!(config.http.max_retries, 3);
}

#[test]
fn test_load_full_endpoint() {
    let yaml = r"
kind: endpoint
name: search-resources
url: https://api.example.com/v1/search
method: POST
headers:
  X-Api-Key: secret
body:
  resource: TrainingJob
page:
  items_path: results
  token_path: pagination.next_token
  token_param: next_token
  token_placement: body
  size_param: max_results
  max_size: 50
http:
  timeout_secs: 10
  max_retries: 1
  requests_per_second: 5
";
    let config = load_endpoint_from_str(yaml).unwrap();

    assert_eq!(config.method, crate::types::Method::POST);
    assert_eq!(config.page.items_path, Some("results".to_string()));
    assert_eq!(config.page.token_path, "pagination.next_token");
    assert_eq!(config.page.token_placement, TokenPlacement::Body);
    assert_eq!(config.page.max_size, 50);
    assert_eq!(config.http.requests_per_second, Some(5));
    assert_eq!(config.body, Some(json!({"resource": "TrainingJob"})));
}

#[test]
fn test_validate_rejects_empty_name() {
    let yaml = r"
name: ''
url: https://api.example.com/v1/items
";
    assert!(load_endpoint_from_str(yaml).is_err());
}

#[test]
fn test_validate_rejects_bad_url() {
    let yaml = r"
name: items
url: not-a-url
";
    assert!(load_endpoint_from_str(yaml).is_err());
}

#[test]
fn test_validate_rejects_zero_max_size() {
    let yaml = r"
name: items
url: https://api.example.com/v1/items
page:
  max_size: 0
";
    assert!(load_endpoint_from_str(yaml).is_err());
}

#[test]
fn test_validate_rejects_body_token_on_get() {
    let yaml = r"
name: items
url: https://api.example.com/v1/items
page:
  token_placement: body
";
    assert!(load_endpoint_from_str(yaml).is_err());
}

#[test]
fn test_load_endpoint_missing_file() {
    let result = load_endpoint("/nonexistent/endpoint.yaml");
    assert!(result.is_err());
}

// ============================================================================
// HttpPageSource over a mock server
// ============================================================================

fn endpoint_for(server: &MockServer, page_yaml: &str) -> EndpointConfig {
    let yaml = format!(
        "name: items\nurl: {}/v1/items\nhttp:\n  max_retries: 0\n{page_yaml}",
        server.uri()
    );
    load_endpoint_from_str(&yaml).unwrap()
}

#[tokio::test]
async fn test_source_extracts_items_and_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1}, {"id": 2}],
            "next_token": "abc"
        })))
        .mount(&server)
        .await;

    let config = endpoint_for(&server, "page:\n  items_path: items\n");
    let source = HttpPageSource::new(config);

    let page = source.fetch_page(&PageQuery::new()).await.unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.items[0]["id"], 1);
    assert_eq!(page.next_token, Some("abc".to_string()));
}

#[tokio::test]
async fn test_source_sends_token_and_size_as_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .and(query_param("next_token", "abc"))
        .and(query_param("max_results", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "next_token": null
        })))
        .mount(&server)
        .await;

    let config = endpoint_for(
        &server,
        "page:\n  items_path: items\n  size_param: max_results\n",
    );
    let source = HttpPageSource::new(config);

    let page = source
        .fetch_page(&PageQuery {
            token: Some("abc".to_string()),
            page_size: Some(25),
        })
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.next_token, None);
}

#[tokio::test]
async fn test_source_sends_static_filters_every_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .and(query_param("status", "running"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1}],
            "next_token": null
        })))
        .mount(&server)
        .await;

    let config = endpoint_for(
        &server,
        "query:\n  status: running\npage:\n  items_path: items\n",
    );
    let source = HttpPageSource::new(config);

    let page = source.fetch_page(&PageQuery::new()).await.unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_source_posts_token_in_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/items"))
        .and(body_partial_json(json!({
            "resource": "TrainingJob",
            "next_token": "abc",
            "max_results": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 3}],
            "next_token": ""
        })))
        .mount(&server)
        .await;

    let yaml = format!(
        concat!(
            "name: search\n",
            "url: {}/v1/items\n",
            "method: POST\n",
            "body:\n",
            "  resource: TrainingJob\n",
            "page:\n",
            "  items_path: results\n",
            "  token_placement: body\n",
            "  size_param: max_results\n",
            "http:\n",
            "  max_retries: 0\n",
        ),
        server.uri()
    );
    let config = load_endpoint_from_str(&yaml).unwrap();
    let source = HttpPageSource::new(config);

    let page = source
        .fetch_page(&PageQuery {
            token: Some("abc".to_string()),
            page_size: Some(10),
        })
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    // Empty-string tokens normalize to absent
    assert_eq!(page.next_token, None);
}

#[tokio::test]
async fn test_source_missing_items_path_is_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next_token": null
        })))
        .mount(&server)
        .await;

    let config = endpoint_for(&server, "page:\n  items_path: items\n");
    let source = HttpPageSource::new(config);

    let page = source.fetch_page(&PageQuery::new()).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_source_non_array_items_path_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": {"oops": true}
        })))
        .mount(&server)
        .await;

    let config = endpoint_for(&server, "page:\n  items_path: items\n");
    let source = HttpPageSource::new(config);

    let result = source.fetch_page(&PageQuery::new()).await;
    assert!(matches!(
        result,
        Err(crate::error::Error::ItemExtraction { .. })
    ));
}

#[tokio::test]
async fn test_source_root_array_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])))
        .mount(&server)
        .await;

    let config = endpoint_for(&server, "");
    let source = HttpPageSource::new(config);

    let page = source.fetch_page(&PageQuery::new()).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.next_token, None);
}

// ============================================================================
// End-to-end: definition + fetcher
// ============================================================================

#[tokio::test]
async fn test_fetcher_walks_tokens_over_http() {
    let server = MockServer::start().await;

    // Page 2 mounts first so the token-less matcher below doesn't shadow it
    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .and(query_param("next_token", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 3}],
            "next_token": null
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1}, {"id": 2}],
            "next_token": "t1"
        })))
        .mount(&server)
        .await;

    let config = endpoint_for(&server, "page:\n  items_path: items\n");
    let fetcher = PagedFetcher::new(HttpPageSource::new(config));

    let drained = fetcher.drain(&FetchOptions::new()).await.unwrap();

    assert_eq!(drained.len(), 3);
    assert_eq!(drained.items[0]["id"], 1);
    assert_eq!(drained.items[2]["id"], 3);
    assert!(drained.is_exhausted());
}
