//! In-memory store backend

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::trace;

use super::{
    matches, Document, Query, RecordId, Store, StoreError, StoreFuture, ID_KEY,
};

/// Collections of insertion-ordered documents behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_of(document: &Document) -> Option<RecordId> {
    document.get(ID_KEY).and_then(RecordId::from_json)
}

impl Store for MemoryStore {
    fn insert<'a>(&'a self, collection: &'a str, mut document: Document) -> StoreFuture<'a, RecordId> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            let documents = collections.entry(collection.to_string()).or_default();

            let id = match id_of(&document) {
                Some(id) => {
                    if documents.iter().any(|d| id_of(d).as_ref() == Some(&id)) {
                        return Err(StoreError::duplicate(collection, &id));
                    }
                    id
                }
                None => RecordId::generate(),
            };

            document.insert(ID_KEY.to_string(), Value::from(id.clone()));
            documents.push(document);
            trace!(collection, id = %id, "document inserted");
            Ok(id)
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a RecordId,
        mut document: Document,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            let slot = collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|d| id_of(d).as_ref() == Some(id)))
                .ok_or_else(|| StoreError::not_found(collection, id))?;

            document.insert(ID_KEY.to_string(), Value::from(id.clone()));
            *slot = document;
            Ok(())
        })
    }

    fn find_one<'a>(&'a self, collection: &'a str, query: &'a Query) -> StoreFuture<'a, Option<Document>> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections
                .get(collection)
                .and_then(|docs| docs.iter().find(|d| matches(d, query)))
                .cloned())
        })
    }

    fn find<'a>(&'a self, collection: &'a str, query: &'a Query) -> StoreFuture<'a, Vec<Document>> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections
                .get(collection)
                .map(|docs| docs.iter().filter(|d| matches(d, query)).cloned().collect())
                .unwrap_or_default())
        })
    }

    fn remove<'a>(&'a self, collection: &'a str, query: &'a Query) -> StoreFuture<'a, u64> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            let Some(documents) = collections.get_mut(collection) else {
                return Ok(0);
            };

            let before = documents.len();
            documents.retain(|d| !matches(d, query));
            Ok((before - documents.len()) as u64)
        })
    }

    fn count<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, u64> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections.get(collection).map_or(0, |docs| docs.len() as u64))
        })
    }

    fn drop_collection<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.collections.write().await.remove(collection);
            Ok(())
        })
    }
}
