//! Local cache of one page of a server-side collection.
//!
//! The store never guesses: `items` and `total` only change in response to a
//! successful server answer, and `total` is never derived from `items`.
//!
//! Overlapping fetches are ordered by a per-store sequence number. Each fetch
//! takes the next number when it starts; only the fetch holding the latest
//! number may write its result, so a slow answer to an old query cannot
//! overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::domain::ports::CollectionGateway;
use crate::domain::{Error, Query, Resource};

/// Result of a fetch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was written to the cache.
    Applied,
    /// A newer fetch started meanwhile; the response was discarded.
    Superseded,
}

/// Consistent copy of the store's state.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSnapshot<R> {
    /// Entities of the last applied page, in server order.
    pub items: Vec<R>,
    /// Server-reported size of the whole collection.
    pub total: u64,
    /// Whether the latest fetch is still in flight.
    pub loading: bool,
}

struct CollectionState<R> {
    items: Vec<R>,
    total: u64,
    loading: bool,
}

impl<R> Default for CollectionState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            loading: false,
        }
    }
}

/// Cache and mutation entry point for one collection.
pub struct CollectionStore<R: Resource> {
    gateway: Arc<dyn CollectionGateway<R>>,
    issued: AtomicU64,
    state: Mutex<CollectionState<R>>,
}

impl<R: Resource> CollectionStore<R> {
    /// Create an empty store backed by `gateway`.
    pub fn new(gateway: Arc<dyn CollectionGateway<R>>) -> Self {
        Self {
            gateway,
            issued: AtomicU64::new(0),
            state: Mutex::new(CollectionState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CollectionState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_latest(&self, sequence: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == sequence
    }

    /// Fetch the page described by `query` and replace the cache with it.
    ///
    /// A failure of the latest fetch empties the cache and zeroes `total`
    /// before returning the error. A fetch overtaken by a newer one returns
    /// [`FetchOutcome::Superseded`] whatever its own result.
    pub async fn fetch(&self, query: &Query) -> Result<FetchOutcome, Error> {
        let sequence = {
            let mut state = self.state();
            state.loading = true;
            self.issued.fetch_add(1, Ordering::SeqCst) + 1
        };
        let _loading = LoadingGuard {
            store: self,
            sequence,
        };
        debug!(
            resource = R::NAME,
            sequence,
            page = query.page().page(),
            limit = query.page().limit(),
            search = query.search(),
            "fetching collection page"
        );

        let result = self.gateway.list(query).await;

        let mut state = self.state();
        if !self.is_latest(sequence) {
            match &result {
                Ok(_) => debug!(resource = R::NAME, sequence, "discarding superseded page"),
                Err(err) => {
                    debug!(resource = R::NAME, sequence, error = %err, "discarding superseded failure");
                }
            }
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                let (items, total) = page.into_parts();
                debug!(resource = R::NAME, sequence, total, count = items.len(), "page applied");
                state.items = items;
                state.total = total;
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                warn!(resource = R::NAME, sequence, error = %err, "fetch failed; cache cleared");
                state.items.clear();
                state.total = 0;
                Err(Error::from(err))
            }
        }
    }

    /// Fetch a single entity. The cache is left untouched.
    pub async fn get(&self, id: &R::Id) -> Result<R, Error> {
        self.gateway.get(id).await.map_err(Error::from)
    }

    /// Create an entity and put it first in the cache.
    pub async fn create(&self, draft: &R::Draft) -> Result<R, Error> {
        let created = self.gateway.create(draft).await.map_err(Error::from)?;
        let mut state = self.state();
        state.items.retain(|item| item.id() != created.id());
        state.items.insert(0, created.clone());
        state.total = state.total.saturating_add(1);
        info!(resource = R::NAME, id = %created.id(), "created");
        Ok(created)
    }

    /// Update an entity and replace the cached copy in place.
    pub async fn update(&self, id: &R::Id, draft: &R::Draft) -> Result<R, Error> {
        let updated = self.gateway.update(id, draft).await.map_err(Error::from)?;
        let mut state = self.state();
        if let Some(slot) = state.items.iter_mut().find(|item| item.id() == id) {
            *slot = updated.clone();
        }
        info!(resource = R::NAME, %id, "updated");
        Ok(updated)
    }

    /// Delete an entity and drop it from the cache.
    pub async fn delete(&self, id: &R::Id) -> Result<(), Error> {
        self.gateway.delete(id).await.map_err(Error::from)?;
        let mut state = self.state();
        state.items.retain(|item| item.id() != id);
        state.total = state.total.saturating_sub(1);
        info!(resource = R::NAME, %id, "deleted");
        Ok(())
    }

    /// Items, total and loading flag read together.
    pub fn snapshot(&self) -> CollectionSnapshot<R> {
        let state = self.state();
        CollectionSnapshot {
            items: state.items.clone(),
            total: state.total,
            loading: state.loading,
        }
    }

    /// Cached entities in server order.
    pub fn items(&self) -> Vec<R> {
        self.state().items.clone()
    }

    /// Server-reported collection size.
    pub fn total(&self) -> u64 {
        self.state().total
    }

    /// Whether the latest fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }
}

/// Clears the loading flag when a fetch ends, however it ends, unless a newer
/// fetch has taken over the flag.
struct LoadingGuard<'a, R: Resource> {
    store: &'a CollectionStore<R>,
    sequence: u64,
}

impl<R: Resource> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        if self.store.is_latest(self.sequence) {
            self.store.state().loading = false;
        }
    }
}

#[cfg(test)]
#[path = "collection_store_tests.rs"]
mod tests;
