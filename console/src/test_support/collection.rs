//! Scripted collection gateway.
//!
//! List answers are matched to requests by page number, so tests control
//! which request is answered first regardless of the order they were issued
//! in. A list answer may be gated on a [`Notify`] to hold it in flight.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagination::Page;
use tokio::sync::Notify;

use crate::domain::ports::{CollectionGateway, GatewayError};
use crate::domain::{Query, Resource};

/// One call received by a [`ScriptedCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionCall {
    /// `list` with its query.
    List(Query),
    /// `get` with the entity id.
    Get(String),
    /// `create`.
    Create,
    /// `update` with the entity id.
    Update(String),
    /// `delete` with the entity id.
    Delete(String),
}

struct ScriptedList<R> {
    page: u32,
    result: Result<Page<R>, GatewayError>,
    release: Option<Arc<Notify>>,
}

struct Script<R> {
    lists: VecDeque<ScriptedList<R>>,
    entities: VecDeque<Result<R, GatewayError>>,
    deletes: VecDeque<Result<(), GatewayError>>,
    calls: Vec<CollectionCall>,
}

/// Gateway answering from queued results.
pub struct ScriptedCollection<R> {
    script: Mutex<Script<R>>,
}

impl<R> Default for ScriptedCollection<R> {
    fn default() -> Self {
        Self {
            script: Mutex::new(Script {
                lists: VecDeque::new(),
                entities: VecDeque::new(),
                deletes: VecDeque::new(),
                calls: Vec::new(),
            }),
        }
    }
}

impl<R> ScriptedCollection<R> {
    fn script(&self) -> MutexGuard<'_, Script<R>> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the answer to the next list request for `page`.
    pub fn push_list(&self, page: u32, result: Result<Page<R>, GatewayError>) {
        self.script().lists.push_back(ScriptedList {
            page,
            result,
            release: None,
        });
    }

    /// Queue a list answer held back until the returned gate is notified.
    pub fn push_gated_list(&self, page: u32, result: Result<Page<R>, GatewayError>) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        self.script().lists.push_back(ScriptedList {
            page,
            result,
            release: Some(release.clone()),
        });
        release
    }

    /// Queue the answer to the next `get`, `create` or `update`.
    pub fn push_entity(&self, result: Result<R, GatewayError>) {
        self.script().entities.push_back(result);
    }

    /// Queue the answer to the next `delete`.
    pub fn push_delete(&self, result: Result<(), GatewayError>) {
        self.script().deletes.push_back(result);
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<CollectionCall> {
        self.script().calls.clone()
    }

    /// List queries received so far, in order.
    pub fn list_queries(&self) -> Vec<Query> {
        self.script()
            .calls
            .iter()
            .filter_map(|call| match call {
                CollectionCall::List(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: CollectionCall) {
        self.script().calls.push(call);
    }

    fn next_entity(&self) -> Result<R, GatewayError> {
        self.script()
            .entities
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::invalid_request("entity script exhausted")))
    }
}

#[async_trait]
impl<R: Resource> CollectionGateway<R> for ScriptedCollection<R> {
    async fn list(&self, query: &Query) -> Result<Page<R>, GatewayError> {
        let page = query.page().page();
        let scripted = {
            let mut script = self.script();
            script.calls.push(CollectionCall::List(query.clone()));
            script
                .lists
                .iter()
                .position(|entry| entry.page == page)
                .and_then(|index| script.lists.remove(index))
        };
        let Some(scripted) = scripted else {
            return Err(GatewayError::invalid_request(format!(
                "no scripted answer for page {page}"
            )));
        };
        if let Some(release) = scripted.release {
            release.notified().await;
        }
        scripted.result
    }

    async fn get(&self, id: &R::Id) -> Result<R, GatewayError> {
        self.record(CollectionCall::Get(id.to_string()));
        self.next_entity()
    }

    async fn create(&self, _draft: &R::Draft) -> Result<R, GatewayError> {
        self.record(CollectionCall::Create);
        self.next_entity()
    }

    async fn update(&self, id: &R::Id, _draft: &R::Draft) -> Result<R, GatewayError> {
        self.record(CollectionCall::Update(id.to_string()));
        self.next_entity()
    }

    async fn delete(&self, id: &R::Id) -> Result<(), GatewayError> {
        self.record(CollectionCall::Delete(id.to_string()));
        self.script()
            .deletes
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::invalid_request("delete script exhausted")))
    }
}
