//! # listwalk
//!
//! A minimal, Rust-native toolkit for draining token-paginated list APIs.
//!
//! ## Features
//!
//! - **Auto-iteration**: walk continuation tokens until the server says done
//! - **Item budgets**: cap total items across pages, with clamped page sizes
//! - **Partial-failure tolerance**: a late page error never discards earlier pages
//! - **Manual paging**: fetch one page at a time and manage tokens yourself
//! - **Declarative endpoints**: describe any list/search endpoint in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listwalk::endpoint::{load_endpoint, HttpPageSource};
//! use listwalk::fetcher::{FetchOptions, PagedFetcher};
//! use listwalk::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = load_endpoint("endpoints/executions.yaml")?;
//!     let fetcher = PagedFetcher::new(HttpPageSource::new(config));
//!
//!     let drained = fetcher
//!         .drain(&FetchOptions::new().with_item_budget(500))
//!         .await?;
//!
//!     for item in &drained.items {
//!         println!("{item}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        PagedFetcher                             │
//! │  drain() → Drained    pages() → Stream    single_page() → Page  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │ PageSource
//! ┌──────────────┬───────────────┴──────────────┬──────────────────┐
//! │   Endpoint   │            HTTP              │      State       │
//! ├──────────────┼──────────────────────────────┼──────────────────┤
//! │ YAML defs    │ GET/POST                     │ Token store      │
//! │ Items path   │ Retry + Backoff              │ Resume           │
//! │ Token path   │ Rate limit                   │ Atomic writes    │
//! └──────────────┴──────────────────────────────┴──────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document the error enum variants before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for listwalk
pub mod error;

/// Common types and type aliases
pub mod types;

/// Token-walking pagination core
pub mod fetcher;

/// HTTP client with retry and rate limiting
pub mod http;

/// Declarative endpoint definitions and the HTTP page source
pub mod endpoint;

/// Continuation-token persistence
pub mod state;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use fetcher::{
    CancelFlag, Completion, Drained, FetchOptions, Page, PageQuery, PageSource, PagedFetcher,
};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
