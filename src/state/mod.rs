//! Continuation-token persistence
//!
//! A stopped drain (manual paging, a budget, a Ctrl-C) leaves behind a
//! continuation token. The token store keeps it on disk so the next run can
//! resume where the last one stopped, with the same filters.

mod manager;
mod types;

pub use manager::TokenStore;
pub use types::{EndpointState, State};

#[cfg(test)]
mod manager_tests;
