//! Declarative endpoint definitions
//!
//! # Overview
//!
//! An endpoint definition is a YAML document describing one token-paginated
//! listing endpoint: its URL and method, the immutable filter/sort
//! parameters, and where items and continuation tokens live in requests and
//! responses. [`HttpPageSource`] turns a definition into a working
//! [`PageSource`](crate::fetcher::PageSource).
//!
//! ```yaml
//! kind: endpoint
//! name: monitoring-executions
//! url: https://api.example.com/v1/executions
//! query:
//!   status: running
//! page:
//!   items_path: executions
//!   token_path: next_token
//!   token_param: next_token
//!   size_param: max_results
//!   max_size: 100
//! ```

mod source;
mod types;

pub use source::HttpPageSource;
pub use types::{EndpointConfig, HttpConfig, PageConfig, TokenPlacement};

use crate::error::{Error, Result};
use crate::types::Method;
use std::fs;
use std::path::Path;

/// Load an endpoint definition from a YAML file
pub fn load_endpoint(path: impl AsRef<Path>) -> Result<EndpointConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read endpoint file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_endpoint_from_str(&content)
}

/// Load an endpoint definition from a YAML string
pub fn load_endpoint_from_str(yaml: &str) -> Result<EndpointConfig> {
    let config: EndpointConfig = serde_yaml::from_str(yaml)?;

    validate_endpoint(&config)?;
    Ok(config)
}

/// Validate an endpoint definition
fn validate_endpoint(config: &EndpointConfig) -> Result<()> {
    if config.name.is_empty() {
        return Err(Error::config("Endpoint name cannot be empty"));
    }

    url::Url::parse(&config.url)?;

    if config.page.max_size == 0 {
        return Err(Error::config("page.max_size must be at least 1"));
    }

    if config.page.token_path.is_empty() {
        return Err(Error::config("page.token_path cannot be empty"));
    }

    if config.page.token_placement == TokenPlacement::Body && config.method == Method::GET {
        return Err(Error::config(
            "token_placement: body requires method: POST",
        ));
    }

    if config.body.is_some() && config.method == Method::GET {
        return Err(Error::config("GET endpoints cannot carry a body"));
    }

    Ok(())
}

#[cfg(test)]
mod tests;
