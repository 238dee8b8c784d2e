//! HTTP page source
//!
//! Binds an endpoint definition to the HTTP client and exposes it as a
//! [`PageSource`]. All that varies between endpoints is request building and
//! extraction of items and tokens from the response body, and all of that is
//! driven by the definition; the drain loop itself is shared.

use super::types::{EndpointConfig, TokenPlacement};
use crate::error::{Error, Result};
use crate::fetcher::{Page, PageQuery, PageSource};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, RequestConfig};
use crate::types::{Method, OptionStringExt};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

/// [`PageSource`] implementation over a declarative endpoint definition
#[derive(Debug)]
pub struct HttpPageSource {
    client: HttpClient,
    config: EndpointConfig,
}

impl HttpPageSource {
    /// Create a source, building an HTTP client from the endpoint's
    /// transport overrides
    pub fn new(config: EndpointConfig) -> Self {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .max_retries(config.http.max_retries);

        builder = match config.http.requests_per_second {
            Some(rps) => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
            None => builder.no_rate_limit(),
        };

        let client = HttpClient::with_config(builder.build());
        Self { client, config }
    }

    /// Create a source with a caller-supplied HTTP client
    pub fn with_client(config: EndpointConfig, client: HttpClient) -> Self {
        Self { client, config }
    }

    /// The endpoint definition backing this source
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Build the per-call request: static filters and headers first, then
    /// the token and page-size fields for this call
    fn build_request(&self, query: &PageQuery) -> RequestConfig {
        let mut request = RequestConfig::new();

        for (key, value) in &self.config.query {
            request = request.query(key, value);
        }
        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        let page = &self.config.page;
        match page.token_placement {
            TokenPlacement::Query => {
                if let Some(token) = &query.token {
                    request = request.query(&page.token_param, token);
                }
                if let (Some(param), Some(size)) = (&page.size_param, query.page_size) {
                    request = request.query(param, size.to_string());
                }
            }
            TokenPlacement::Body => {
                let mut body = match &self.config.body {
                    Some(Value::Object(map)) => map.clone(),
                    _ => Map::new(),
                };
                if let Some(token) = &query.token {
                    body.insert(page.token_param.clone(), Value::String(token.clone()));
                }
                if let (Some(param), Some(size)) = (&page.size_param, query.page_size) {
                    body.insert(param.clone(), Value::Number(size.into()));
                }
                request = request.json(Value::Object(body));
            }
        }

        request
    }

    fn extract_items(&self, body: &Value) -> Result<Vec<Value>> {
        match &self.config.page.items_path {
            Some(path) => match extract_path(body, path) {
                Some(Value::Array(items)) => Ok(items.clone()),
                Some(_) => Err(Error::extraction(path, "value at path is not an array")),
                // A missing item field is how some servers spell an empty page
                None => Ok(vec![]),
            },
            None => match body {
                Value::Array(items) => Ok(items.clone()),
                _ => Err(Error::extraction(
                    "$",
                    "response body root is not an array; set page.items_path",
                )),
            },
        }
    }

    fn extract_token(&self, body: &Value) -> Option<String> {
        extract_path(body, &self.config.page.token_path)
            .and_then(value_to_token)
            .none_if_empty()
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    type Item = Value;

    async fn fetch_page(&self, query: &PageQuery) -> Result<Page<Value>> {
        let request = self.build_request(query);

        let response = match self.config.method {
            Method::GET => {
                self.client
                    .get_with_config(&self.config.url, request)
                    .await?
            }
            Method::POST => {
                self.client
                    .post_with_config(&self.config.url, request)
                    .await?
            }
        };

        let body: Value = response.json().await.map_err(Error::Http)?;
        let items = self.extract_items(&body)?;
        let next_token = self.extract_token(&body);

        Ok(Page::new(items, next_token))
    }
}

/// Walk a dot-notation path through nested JSON objects
fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Render a token value as a string; null and non-scalar values mean absent
fn value_to_token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod extract_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_path_nested() {
        let body = json!({"pagination": {"next": "abc"}});
        assert_eq!(
            extract_path(&body, "pagination.next"),
            Some(&json!("abc"))
        );
        assert_eq!(
            extract_path(&body, "$.pagination.next"),
            Some(&json!("abc"))
        );
        assert_eq!(extract_path(&body, "pagination.prev"), None);
        assert_eq!(extract_path(&body, "missing.next"), None);
    }

    #[test]
    fn test_value_to_token() {
        assert_eq!(value_to_token(&json!("abc")), Some("abc".to_string()));
        assert_eq!(value_to_token(&json!(42)), Some("42".to_string()));
        assert_eq!(value_to_token(&json!(null)), None);
        assert_eq!(value_to_token(&json!({"a": 1})), None);
    }
}
