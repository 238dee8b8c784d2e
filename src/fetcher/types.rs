//! Fetcher types and traits
//!
//! Defines the page abstraction, the injected page source, and the
//! caller-local iteration bookkeeping.

use crate::error::Result;
use crate::types::OptionStringExt;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default server-side ceiling on per-call page sizes
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Page
// ============================================================================

/// One page of results from a listing endpoint
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Continuation token for the next page, absent when the listing is done
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Create a page with a continuation token
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    /// Create a final page (no continuation token)
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if the server signalled more pages
    pub fn has_more(&self) -> bool {
        self.next_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

// ============================================================================
// PageQuery
// ============================================================================

/// The per-call fields re-sent on every page fetch
///
/// Filter and sort parameters are deliberately NOT part of the query: they
/// live inside the [`PageSource`] implementation, fixed for the lifetime of
/// an iteration, so a token can never be combined with different filters
/// than the ones that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Continuation token to resume from, absent on the first call
    pub token: Option<String>,
    /// Requested (not guaranteed) page size for this call
    pub page_size: Option<u32>,
}

impl PageQuery {
    /// Create a first-page query
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a query resuming from a token
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            page_size: None,
        }
    }
}

// ============================================================================
// PageSource
// ============================================================================

/// The single remote operation the fetcher wraps
///
/// Implementations own the endpoint identity and its immutable filter/sort
/// parameters; the fetcher only varies the token and page size between calls.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Item type carried by each page
    type Item: Send;

    /// Fetch one page for the given token and page-size hint
    async fn fetch_page(&self, query: &PageQuery) -> Result<Page<Self::Item>>;
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation flag checked between page fetches
///
/// Cancellation is not an error: the drain stops cleanly and whatever has
/// been emitted so far is the final result.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// FetchOptions
// ============================================================================

/// Options for one logical listing operation
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Token to resume from (e.g. saved by a prior manual-page call)
    pub initial_token: Option<String>,
    /// Maximum items to emit across all pages, absent means fetch until done
    pub item_budget: Option<u64>,
    /// Requested page size, clamped to `max_page_size`
    pub page_size_hint: Option<u32>,
    /// Server-documented per-call page size ceiling
    pub max_page_size: u32,
    /// Cancellation flag polled between pages
    pub cancel: CancelFlag,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            initial_token: None,
            item_budget: None,
            page_size_hint: None,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            cancel: CancelFlag::new(),
        }
    }
}

impl FetchOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume iteration from a previously obtained token
    #[must_use]
    pub fn resume_from(mut self, token: impl Into<String>) -> Self {
        self.initial_token = Some(token.into());
        self
    }

    /// Cap the total number of items emitted across all pages
    #[must_use]
    pub fn with_item_budget(mut self, budget: u64) -> Self {
        self.item_budget = Some(budget);
        self
    }

    /// Request a specific page size per call
    #[must_use]
    pub fn with_page_size_hint(mut self, hint: u32) -> Self {
        self.page_size_hint = Some(hint);
        self
    }

    /// Override the server page size ceiling
    #[must_use]
    pub fn with_max_page_size(mut self, max: u32) -> Self {
        self.max_page_size = max;
        self
    }

    /// Attach a cancellation flag
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Page size hint clamped to the server ceiling
    pub fn clamped_hint(&self) -> u32 {
        self.page_size_hint
            .map_or(self.max_page_size, |h| h.min(self.max_page_size))
    }
}

// ============================================================================
// IterationState
// ============================================================================

/// Tracks progress of one drain, created fresh per invocation
#[derive(Debug, Clone)]
pub struct IterationState {
    /// Current continuation token
    pub token: Option<String>,
    /// Items emitted so far
    pub emitted: u64,
    /// Remaining item budget, absent when unbounded
    pub remaining: Option<u64>,
    /// Pages fetched so far
    pub pages_fetched: u64,
}

impl IterationState {
    /// Create state for a fresh iteration
    pub fn start(options: &FetchOptions) -> Self {
        Self {
            token: options.initial_token.clone(),
            emitted: 0,
            remaining: options.item_budget,
            pages_fetched: 0,
        }
    }

    /// Page size to request on the next call: `min(clamped hint, remaining)`
    pub fn next_page_size(&self, options: &FetchOptions) -> u32 {
        let hint = options.clamped_hint();
        match self.remaining {
            Some(rem) => hint.min(rem.min(u64::from(u32::MAX)) as u32),
            None => hint,
        }
    }

    /// Absorb an incoming page of `count` items, returning how many fit
    /// within the remaining budget
    pub fn absorb(&mut self, count: usize) -> usize {
        let take = match self.remaining {
            Some(rem) => count.min(rem as usize),
            None => count,
        };
        self.emitted += take as u64;
        if let Some(rem) = &mut self.remaining {
            *rem -= take as u64;
        }
        self.pages_fetched += 1;
        take
    }

    /// Record the continuation token for the next page, treating empty as absent
    pub fn advance(&mut self, next_token: Option<String>) {
        self.token = next_token.none_if_empty();
    }

    /// Check if a bounded budget has been fully spent
    pub fn budget_spent(&self) -> bool {
        matches!(self.remaining, Some(0))
    }
}

// ============================================================================
// Drained
// ============================================================================

/// How a drain ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The server returned no continuation token
    Exhausted,
    /// The item budget was met before the server ran out of pages
    BudgetReached,
    /// A later page failed after items had already been emitted; the partial
    /// result was kept
    Truncated,
    /// Cancellation was observed between pages
    Cancelled,
}

/// Result of a completed drain
#[derive(Debug, Clone)]
pub struct Drained<T> {
    /// All emitted items, in server order
    pub items: Vec<T>,
    /// Token to resume from, absent when the listing was exhausted
    pub next_token: Option<String>,
    /// How the drain ended
    pub completion: Completion,
    /// Pages fetched during the drain
    pub pages_fetched: u64,
}

impl<T> Drained<T> {
    /// Number of items emitted
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing was emitted
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if the server's listing was fully consumed
    pub fn is_exhausted(&self) -> bool {
        self.completion == Completion::Exhausted
    }
}
