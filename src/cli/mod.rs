//! CLI module
//!
//! Command-line interface for draining endpoints.
//!
//! # Commands
//!
//! - `fetch` - Drain the endpoint to NDJSON on stdout
//! - `page` - Fetch one page and print it with its token
//! - `validate` - Check an endpoint definition
//! - `state` - Print the saved state

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
