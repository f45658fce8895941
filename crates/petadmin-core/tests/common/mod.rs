#![allow(clippy::unwrap_used, dead_code)]
// Scripted in-memory facade for store and hook tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use petadmin_core::{
    CoreError, Entity, EntityFacade, EntityId, EntityKind, PageResult, Related, RelationFacade,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: EntityId,
    pub name: String,
}

impl Entity for Item {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub id: EntityId,
    pub children: Vec<EntityId>,
}

impl Entity for Detail {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Related for Detail {
    fn related_ids(&self) -> Vec<EntityId> {
        self.children.clone()
    }

    fn remove_related(&mut self, id: EntityId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != id);
        before != self.children.len()
    }
}

/// One recorded `list` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub page: u32,
    pub size: u32,
    pub term: Option<String>,
}

/// A facade whose latency and failures are scripted per test.
///
/// `list` returns `min(size, 3)` items named `"{term}:{page}:{n}"`, so a
/// snapshot's items always reveal which request produced them.
pub struct MockFacade {
    pub total_pages: AtomicU64,
    pub list_latency: Mutex<HashMap<String, Duration>>,
    pub detail_latency: Mutex<Duration>,
    pub list_calls: Mutex<Vec<ListCall>>,
    pub detail_calls: AtomicUsize,
    pub relation_calls: Mutex<Vec<(&'static str, EntityId, EntityId)>>,
    pub next_id: AtomicU64,
    pub fail_list: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl Default for MockFacade {
    fn default() -> Self {
        Self {
            total_pages: AtomicU64::new(5),
            list_latency: Mutex::new(HashMap::new()),
            detail_latency: Mutex::new(Duration::from_millis(20)),
            list_calls: Mutex::new(Vec::new()),
            detail_calls: AtomicUsize::new(0),
            relation_calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(100),
            fail_list: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }
}

impl MockFacade {
    pub fn with_latency(self, term: &str, latency: Duration) -> Self {
        self.list_latency
            .lock()
            .unwrap()
            .insert(term.to_owned(), latency);
        self
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, term: &str) -> usize {
        self.list_calls()
            .iter()
            .filter(|c| c.term.as_deref() == Some(term))
            .count()
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn write_error(&self) -> Option<CoreError> {
        self.fail_writes
            .load(Ordering::SeqCst)
            .then(|| CoreError::ValidationFailed {
                message: "name already taken".into(),
            })
    }
}

pub fn page_items(term: &str, page: u32, size: u32) -> Vec<Item> {
    (0..size.min(3))
        .map(|n| Item {
            id: u64::from(page * 10 + n + 1),
            name: format!("{term}:{page}:{n}"),
        })
        .collect()
}

impl EntityFacade for MockFacade {
    type Summary = Item;
    type Detail = Detail;
    type CreateInput = String;
    type UpdateInput = String;

    const KIND: EntityKind = EntityKind::Pet;

    async fn list(
        &self,
        page: u32,
        size: u32,
        term: Option<&str>,
    ) -> Result<PageResult<Item>, CoreError> {
        let key = term.unwrap_or_default().to_owned();
        self.list_calls.lock().unwrap().push(ListCall {
            page,
            size,
            term: term.map(str::to_owned),
        });
        let latency = self
            .list_latency
            .lock()
            .unwrap()
            .get(&key)
            .copied()
            .unwrap_or(Duration::from_millis(50));
        tokio::time::sleep(latency).await;

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(CoreError::Api {
                message: String::new(),
                status: Some(500),
            });
        }
        Ok(PageResult {
            items: page_items(&key, page, size),
            total: 42,
            total_pages: u32::try_from(self.total_pages.load(Ordering::SeqCst)).unwrap(),
        })
    }

    async fn get_detail(&self, id: EntityId) -> Result<Detail, CoreError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.detail_latency.lock().unwrap();
        tokio::time::sleep(latency).await;
        if id == 404 {
            return Err(CoreError::NotFound {
                entity_type: "pet".into(),
                identifier: id.to_string(),
            });
        }
        Ok(Detail {
            id,
            children: vec![1, 2],
        })
    }

    async fn create(&self, name: String) -> Result<Item, CoreError> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if let Some(e) = self.write_error() {
            return Err(e);
        }
        Ok(Item {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name,
        })
    }

    async fn update(&self, id: EntityId, name: String) -> Result<Item, CoreError> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if let Some(e) = self.write_error() {
            return Err(e);
        }
        Ok(Item { id, name })
    }

    async fn delete(&self, _id: EntityId) -> Result<(), CoreError> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.write_error().map_or(Ok(()), Err)
    }
}

impl RelationFacade for MockFacade {
    async fn link(&self, parent: EntityId, child: EntityId) -> Result<(), CoreError> {
        self.relation_calls
            .lock()
            .unwrap()
            .push(("link", parent, child));
        self.write_error().map_or(Ok(()), Err)
    }

    async fn unlink(&self, parent: EntityId, child: EntityId) -> Result<(), CoreError> {
        self.relation_calls
            .lock()
            .unwrap()
            .push(("unlink", parent, child));
        self.write_error().map_or(Ok(()), Err)
    }
}
