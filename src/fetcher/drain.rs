//! The token-walking drain loop
//!
//! One generic implementation of continuation-token iteration, parameterized
//! by an injected [`PageSource`]. Endpoint-specific listing operations supply
//! only request building and item extraction.

use super::types::{
    Completion, Drained, FetchOptions, IterationState, Page, PageQuery, PageSource,
};
use crate::error::Result;
use crate::types::OptionStringExt;
use futures::Stream;
use tracing::{debug, warn};

/// Drives repeated calls to a paginated endpoint, hiding token bookkeeping
///
/// The fetcher is sequential: each page fetch is issued only after the
/// previous one completes. It never retries, never reorders items, and never
/// reinterprets errors; retry policy belongs to the transport below the
/// [`PageSource`].
pub struct PagedFetcher<S> {
    source: S,
}

impl<S: PageSource> PagedFetcher<S> {
    /// Create a fetcher over the given page source
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Borrow the underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consume the fetcher, returning the source
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Fetch pages until the server is done, the budget is met, or the
    /// cancellation flag is raised, collecting all emitted items
    ///
    /// Error policy: a failure before anything has been emitted, or on an
    /// unbounded drain, is propagated as-is. A failure after at least one
    /// page has been emitted on a bounded drain is suppressed: the caller
    /// already expressed early-stopping intent, so the partial result stands
    /// and the drain reports [`Completion::Truncated`].
    pub async fn drain(&self, options: &FetchOptions) -> Result<Drained<S::Item>> {
        let mut state = IterationState::start(options);
        let mut items: Vec<S::Item> = Vec::new();

        loop {
            if options.cancel.is_cancelled() {
                debug!(emitted = state.emitted, "drain cancelled between pages");
                return Ok(self.finish(items, &state, Completion::Cancelled));
            }

            let query = PageQuery {
                token: state.token.clone(),
                page_size: Some(state.next_page_size(options)),
            };

            let page = match self.source.fetch_page(&query).await {
                Ok(page) => page,
                Err(err) => {
                    if state.emitted == 0 || options.item_budget.is_none() {
                        return Err(err);
                    }
                    warn!(
                        error = %err,
                        emitted = state.emitted,
                        "page fetch failed after partial results, keeping pages emitted so far"
                    );
                    return Ok(self.finish(items, &state, Completion::Truncated));
                }
            };

            let take = state.absorb(page.items.len());
            items.extend(page.items.into_iter().take(take));
            state.advance(page.next_token);

            debug!(
                page = state.pages_fetched,
                emitted = state.emitted,
                has_more = state.token.is_some(),
                "page fetched"
            );

            if state.token.is_none() {
                return Ok(self.finish(items, &state, Completion::Exhausted));
            }
            if state.budget_spent() {
                return Ok(self.finish(items, &state, Completion::BudgetReached));
            }
        }
    }

    /// Fetch exactly one page and expose its continuation token to the caller
    ///
    /// Manual paging mode: no looping occurs, and the caller owns resuming
    /// from the returned token.
    pub async fn single_page(&self, options: &FetchOptions) -> Result<Page<S::Item>> {
        let state = IterationState::start(options);
        let query = PageQuery {
            token: state.token.clone(),
            page_size: Some(state.next_page_size(options)),
        };

        let mut page = self.source.fetch_page(&query).await?;
        page.next_token = page.next_token.none_if_empty();
        Ok(page)
    }

    /// Lazily walk pages under the same termination and error policy as
    /// [`drain`](Self::drain)
    ///
    /// Each yielded page carries the token to resume from after it; pages are
    /// truncated to the remaining budget before being yielded. A suppressed
    /// late-page failure ends the stream without an error item.
    pub fn pages(&self, options: FetchOptions) -> impl Stream<Item = Result<Page<S::Item>>> + '_ {
        let state = IterationState::start(&options);
        futures::stream::try_unfold(
            (state, options, false),
            move |(mut state, options, started)| async move {
                if started && (state.token.is_none() || state.budget_spent()) {
                    return Ok(None);
                }
                if options.cancel.is_cancelled() {
                    debug!(emitted = state.emitted, "page stream cancelled");
                    return Ok(None);
                }

                let query = PageQuery {
                    token: state.token.clone(),
                    page_size: Some(state.next_page_size(&options)),
                };

                match self.source.fetch_page(&query).await {
                    Ok(mut page) => {
                        let take = state.absorb(page.items.len());
                        page.items.truncate(take);
                        state.advance(page.next_token);
                        let out = Page::new(page.items, state.token.clone());
                        Ok(Some((out, (state, options, true))))
                    }
                    Err(err) => {
                        if state.emitted == 0 || options.item_budget.is_none() {
                            return Err(err);
                        }
                        warn!(
                            error = %err,
                            emitted = state.emitted,
                            "page fetch failed after partial results, ending stream"
                        );
                        Ok(None)
                    }
                }
            },
        )
    }

    fn finish(
        &self,
        items: Vec<S::Item>,
        state: &IterationState,
        completion: Completion,
    ) -> Drained<S::Item> {
        Drained {
            items,
            next_token: state.token.clone(),
            completion,
            pages_fetched: state.pages_fetched,
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for PagedFetcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedFetcher")
            .field("source", &self.source)
            .finish()
    }
}
