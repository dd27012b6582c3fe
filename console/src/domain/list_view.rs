//! List view state: search, category filter and page, composed into fetches
//! against a [`CollectionStore`].
//!
//! Search input is debounced before it is committed. Committing new search
//! text or picking another category rewinds to page 1; moving between pages
//! keeps both filters. The page shown is refined client-side for display
//! only, so totals and page bounds always come from the server.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pagination::{PageRequest, PageSlot, PaginationError, contains_page, page_count, page_slots};
use tracing::{debug, warn};

use crate::domain::collection_store::{CollectionStore, FetchOutcome};
use crate::domain::debounce::Debouncer;
use crate::domain::{CategoryFilter, Error, Query, Refinement, Resource};

/// Fetch lifecycle of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// The latest fetch is in flight.
    Loading,
    /// The latest fetch was applied.
    Ready,
    /// The latest fetch failed; the list is empty.
    Error(String),
}

/// Pagination controls derived from the server total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    /// Current page, one-based.
    pub page: u32,
    /// Number of pages; zero for an empty collection.
    pub page_count: u64,
    /// Whether a previous page exists.
    pub has_previous: bool,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Numbered buttons and ellipses to render.
    pub slots: Vec<PageSlot>,
}

#[derive(Debug, Default)]
struct ViewState {
    draft_search: String,
    search: String,
    category: Option<CategoryFilter>,
    page: u32,
    status: ViewStatus,
}

/// Controller for one list screen.
pub struct ListViewController<R: Resource> {
    store: Arc<CollectionStore<R>>,
    request: PageRequest,
    state: Mutex<ViewState>,
    debouncer: Debouncer,
}

impl<R: Resource> ListViewController<R> {
    /// Create a controller listing `limit` entities per page.
    pub fn new(
        store: Arc<CollectionStore<R>>,
        limit: u32,
        debounce: Duration,
    ) -> Result<Self, PaginationError> {
        let request = PageRequest::first(limit)?;
        Ok(Self {
            store,
            request,
            state: Mutex::new(ViewState {
                page: request.page(),
                ..ViewState::default()
            }),
            debouncer: Debouncer::new(debounce),
        })
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Backing store.
    pub fn store(&self) -> &Arc<CollectionStore<R>> {
        &self.store
    }

    /// Query for the current search, category and page.
    pub fn query(&self) -> Query {
        let state = self.state();
        let page = self
            .request
            .with_page(state.page)
            .unwrap_or_else(|_| self.request.rewind());
        Query::new(
            page,
            &state.search,
            state.category.as_ref().map(|filter| filter.id.clone()),
        )
    }

    /// Current fetch status.
    pub fn status(&self) -> ViewStatus {
        self.state().status.clone()
    }

    /// Search text as typed, committed or not.
    pub fn search_text(&self) -> String {
        self.state().draft_search.clone()
    }

    /// Selected category.
    pub fn category(&self) -> Option<CategoryFilter> {
        self.state().category.clone()
    }

    /// Current page, one-based.
    pub fn page(&self) -> u32 {
        self.state().page
    }

    /// Page size.
    pub fn limit(&self) -> u32 {
        self.request.limit()
    }

    /// First fetch when the screen opens.
    pub async fn mount(&self) -> Result<FetchOutcome, Error> {
        self.run_fetch(self.query()).await
    }

    /// Fetch the current query again, e.g. after an error.
    pub async fn refresh(&self) -> Result<FetchOutcome, Error> {
        self.run_fetch(self.query()).await
    }

    /// Record a keystroke in the search box.
    ///
    /// The text is committed once no further input arrives for the debounce
    /// delay. Failures of that background fetch surface through
    /// [`status`](Self::status).
    pub fn input_search(self: &Arc<Self>, text: &str) {
        self.state().draft_search = text.to_owned();
        let this = Arc::clone(self);
        self.debouncer.schedule(async move {
            if let Err(err) = this.commit_search().await {
                warn!(resource = R::NAME, error = %err, "debounced search failed");
            }
        });
    }

    /// Commit the typed search text now, skipping the debounce delay.
    ///
    /// Returns `Ok(None)` when the committed text did not change.
    pub async fn flush_search(&self) -> Result<Option<FetchOutcome>, Error> {
        self.debouncer.cancel();
        self.commit_search().await
    }

    /// Wait for a pending debounced search to be committed and fetched.
    pub async fn settle(&self) {
        self.debouncer.settle().await;
    }

    async fn commit_search(&self) -> Result<Option<FetchOutcome>, Error> {
        let query = {
            let mut state = self.state();
            let committed = state.draft_search.trim().to_owned();
            if committed == state.search {
                return Ok(None);
            }
            debug!(resource = R::NAME, search = %committed, "search committed");
            state.search = committed;
            state.page = 1;
            drop(state);
            self.query()
        };
        self.run_fetch(query).await.map(Some)
    }

    /// Filter by `category`, or clear the filter with `None`.
    ///
    /// Returns `Ok(None)` when the selection did not change.
    pub async fn select_category(
        &self,
        category: Option<CategoryFilter>,
    ) -> Result<Option<FetchOutcome>, Error> {
        {
            let mut state = self.state();
            if state.category == category {
                return Ok(None);
            }
            state.category = category;
            state.page = 1;
        }
        self.run_fetch(self.query()).await.map(Some)
    }

    /// Jump to `page`.
    ///
    /// Pages outside `1..=page_count` and the current page are ignored with
    /// `Ok(None)`.
    pub async fn go_to_page(&self, page: u32) -> Result<Option<FetchOutcome>, Error> {
        let count = self.page_count();
        {
            let mut state = self.state();
            if page == state.page || !contains_page(u64::from(page), count) {
                return Ok(None);
            }
            state.page = page;
        }
        self.run_fetch(self.query()).await.map(Some)
    }

    /// Move one page forward, if possible.
    pub async fn next_page(&self) -> Result<Option<FetchOutcome>, Error> {
        let Some(target) = self.page().checked_add(1) else {
            return Ok(None);
        };
        self.go_to_page(target).await
    }

    /// Move one page back, if possible.
    pub async fn previous_page(&self) -> Result<Option<FetchOutcome>, Error> {
        let Some(target) = self.page().checked_sub(1) else {
            return Ok(None);
        };
        self.go_to_page(target).await
    }

    async fn run_fetch(&self, query: Query) -> Result<FetchOutcome, Error> {
        self.state().status = ViewStatus::Loading;
        let result = self.store.fetch(&query).await;
        let settled = !self.store.is_loading();
        match &result {
            Ok(FetchOutcome::Applied) if settled => self.state().status = ViewStatus::Ready,
            Err(err) if settled => {
                self.state().status = ViewStatus::Error(err.message().to_owned());
            }
            _ => {}
        }
        result
    }

    /// Entities of the current page after client-side refinement.
    pub fn visible_items(&self) -> Vec<R> {
        let refinement = {
            let state = self.state();
            Refinement::new(&state.search, state.category.clone())
        };
        self.store
            .items()
            .into_iter()
            .filter(|item| item.matches(&refinement))
            .collect()
    }

    /// Number of pages implied by the server total.
    pub fn page_count(&self) -> u64 {
        page_count(self.store.total(), self.request.limit())
    }

    /// Previous/next availability and numbered page slots.
    pub fn controls(&self) -> PageControls {
        let count = self.page_count();
        let page = self.page();
        let current = u64::from(page);
        PageControls {
            page,
            page_count: count,
            has_previous: current > 1,
            has_next: current < count,
            slots: page_slots(current, count),
        }
    }
}

#[cfg(test)]
#[path = "list_view_tests.rs"]
mod tests;
