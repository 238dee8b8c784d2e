//! Token-walking pagination core
//!
//! # Overview
//!
//! The fetcher module implements continuation-token iteration exactly once,
//! parameterized by an injected [`PageSource`]. It walks tokens until the
//! server signals completion, optionally caps total items emitted, preserves
//! pages already emitted when a later page fails, and checks a cancellation
//! flag between fetches.
//!
//! Three consumption modes:
//!
//! - [`PagedFetcher::drain`] - collect everything into one result
//! - [`PagedFetcher::pages`] - lazy stream of pages
//! - [`PagedFetcher::single_page`] - manual paging, caller owns the token

mod drain;
mod types;

pub use drain::PagedFetcher;
pub use types::{
    CancelFlag, Completion, Drained, FetchOptions, IterationState, Page, PageQuery, PageSource,
    DEFAULT_MAX_PAGE_SIZE,
};
