//! Endpoint definition types
//!
//! Structures describing a token-paginated listing endpoint, loaded from
//! YAML. One definition carries everything endpoint-specific: URL, method,
//! filter/sort parameters, and where items and tokens live in the response.

use crate::fetcher::DEFAULT_MAX_PAGE_SIZE;
use crate::types::{Method, StringMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Top-Level Endpoint Config
// ============================================================================

/// Complete endpoint definition loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Kind of config (always "endpoint")
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Unique endpoint name (e.g., "monitoring-executions")
    pub name: String,

    /// Full URL of the listing endpoint
    pub url: String,

    /// HTTP method: GET for list-style, POST for search-style endpoints
    #[serde(default)]
    pub method: Method,

    /// Immutable filter/sort query parameters, re-sent verbatim every call
    ///
    /// A continuation token is only valid with the parameters that produced
    /// it; these are fixed at load time so that cannot be violated.
    #[serde(default)]
    pub query: StringMap,

    /// Static request headers (API keys, accept headers)
    #[serde(default)]
    pub headers: StringMap,

    /// Static JSON body template for POST endpoints
    #[serde(default)]
    pub body: Option<Value>,

    /// Pagination field mapping
    #[serde(default)]
    pub page: PageConfig,

    /// HTTP transport overrides
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_kind() -> String {
    "endpoint".to_string()
}

// ============================================================================
// Page Config
// ============================================================================

/// Where pagination fields live in requests and responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Dot-notation path to the item array in the response body
    /// (absent = the body root is the array)
    #[serde(default)]
    pub items_path: Option<String>,

    /// Dot-notation path to the continuation token in the response body
    #[serde(default = "default_token_path")]
    pub token_path: String,

    /// Request field carrying the continuation token
    #[serde(default = "default_token_param")]
    pub token_param: String,

    /// Where the token (and page size) are placed in the request
    #[serde(default)]
    pub token_placement: TokenPlacement,

    /// Request field carrying the page-size hint (absent = never sent)
    #[serde(default)]
    pub size_param: Option<String>,

    /// Server-documented page size ceiling
    #[serde(default = "default_max_size")]
    pub max_size: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            items_path: None,
            token_path: default_token_path(),
            token_param: default_token_param(),
            token_placement: TokenPlacement::default(),
            size_param: None,
            max_size: default_max_size(),
        }
    }
}

fn default_token_path() -> String {
    "next_token".to_string()
}

fn default_token_param() -> String {
    "next_token".to_string()
}

fn default_max_size() -> u32 {
    DEFAULT_MAX_PAGE_SIZE
}

/// Where pagination fields are carried on the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPlacement {
    /// Query-string parameters (list-style GET endpoints)
    #[default]
    Query,
    /// Top-level JSON body fields (search-style POST endpoints)
    Body,
}

// ============================================================================
// HTTP Config
// ============================================================================

/// Transport overrides for one endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum transport-level retries per page fetch
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Requests per second, absent disables rate limiting
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            requests_per_second: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}
