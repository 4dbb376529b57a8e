use std::fmt;
use std::sync::Arc;

use super::{Document, Query, RecordId, Store, StoreResult};

/// A shared store paired with one collection name.
#[derive(Clone)]
pub struct Collection {
    store: Arc<dyn Store>,
    name: Arc<str>,
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection").field("name", &self.name).finish()
    }
}

impl Collection {
    pub fn new(store: Arc<dyn Store>, name: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub async fn insert(&self, document: Document) -> StoreResult<RecordId> {
        self.store.insert(&self.name, document).await
    }

    pub async fn update(&self, id: &RecordId, document: Document) -> StoreResult<()> {
        self.store.update(&self.name, id, document).await
    }

    pub async fn find_one(&self, query: &Query) -> StoreResult<Option<Document>> {
        self.store.find_one(&self.name, query).await
    }

    pub async fn find(&self, query: &Query) -> StoreResult<Vec<Document>> {
        self.store.find(&self.name, query).await
    }

    pub async fn remove(&self, query: &Query) -> StoreResult<u64> {
        self.store.remove(&self.name, query).await
    }

    pub async fn count(&self) -> StoreResult<u64> {
        self.store.count(&self.name).await
    }

    pub async fn drop_collection(&self) -> StoreResult<()> {
        self.store.drop_collection(&self.name).await
    }
}
