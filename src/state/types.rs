//! State types for tracking fetch progress
//!
//! These types are serialized to JSON and persisted between runs so a
//! stopped drain can resume from its last continuation token.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete persisted state, keyed by endpoint name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Per-endpoint fetch state
    #[serde(default)]
    pub endpoints: HashMap<String, EndpointState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for an endpoint
    pub fn get_endpoint(&self, endpoint: &str) -> Option<&EndpointState> {
        self.endpoints.get(endpoint)
    }

    /// Get mutable state for an endpoint, creating if needed
    pub fn get_endpoint_mut(&mut self, endpoint: &str) -> &mut EndpointState {
        self.endpoints.entry(endpoint.to_string()).or_default()
    }

    /// Get the saved continuation token for an endpoint
    pub fn get_token(&self, endpoint: &str) -> Option<&str> {
        self.endpoints.get(endpoint)?.token.as_deref()
    }

    /// Save a continuation token for an endpoint; `None` marks the listing
    /// as fully consumed
    pub fn set_token(&mut self, endpoint: &str, token: Option<String>) {
        self.get_endpoint_mut(endpoint).token = token;
    }
}

/// Fetch state for a single endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointState {
    /// Continuation token to resume from, absent when exhausted
    #[serde(default)]
    pub token: Option<String>,

    /// Items emitted across all runs, informational
    #[serde(default)]
    pub items_emitted: u64,
}

impl EndpointState {
    /// Create a new empty endpoint state
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_default() {
        let state = State::new();
        assert!(state.endpoints.is_empty());
    }

    #[test]
    fn test_state_token_roundtrip() {
        let mut state = State::new();
        assert!(state.get_token("executions").is_none());

        state.set_token("executions", Some("t1".to_string()));
        assert_eq!(state.get_token("executions"), Some("t1"));

        state.set_token("executions", None);
        assert!(state.get_token("executions").is_none());
    }

    #[test]
    fn test_state_serialization() {
        let mut state = State::new();
        state.set_token("executions", Some("t1".to_string()));
        state.get_endpoint_mut("executions").items_emitted = 250;

        let json = serde_json::to_string(&state).unwrap();
        let restored: State = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.get_token("executions"), Some("t1"));
        assert_eq!(
            restored.get_endpoint("executions").unwrap().items_emitted,
            250
        );
    }
}
