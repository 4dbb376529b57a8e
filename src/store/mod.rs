//! # Store
//!
//! The asynchronous document collection that models persist to.
//!
//! Models only ever talk to a store through the [`Store`] trait: insert,
//! update by identity, find one, find many, remove, count and drop. Documents
//! are plain JSON objects; the identity lives under [`ID_KEY`].
//!
//! Connection management, pooling and transport are the backend's concern.
//! [`MemoryStore`] is the in-process backend used by the CLI and tests.

mod collection;
mod errors;
mod memory;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub use collection::Collection;
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

/// Key holding a document's identity
pub const ID_KEY: &str = "_id";

/// A stored record: field name to JSON value
pub type Document = Map<String, Value>;

/// Equality filter: every entry must match the document
pub type Query = Map<String, Value>;

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Opaque record identity assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reads an identity from a document value; only strings qualify.
    pub fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::String(id.0)
    }
}

/// Asynchronous document store
pub trait Store: Send + Sync {
    /// Insert a document and return its identity.
    ///
    /// A document that already carries `_id` keeps it.
    fn insert<'a>(&'a self, collection: &'a str, document: Document) -> StoreFuture<'a, RecordId>;

    /// Replace the document with the given identity
    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a RecordId,
        document: Document,
    ) -> StoreFuture<'a, ()>;

    /// First matching document, in insertion order
    fn find_one<'a>(&'a self, collection: &'a str, query: &'a Query) -> StoreFuture<'a, Option<Document>>;

    /// All matching documents, in insertion order
    fn find<'a>(&'a self, collection: &'a str, query: &'a Query) -> StoreFuture<'a, Vec<Document>>;

    /// Remove matching documents and return how many were removed.
    ///
    /// An empty query removes everything.
    fn remove<'a>(&'a self, collection: &'a str, query: &'a Query) -> StoreFuture<'a, u64>;

    fn count<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, u64>;

    fn drop_collection<'a>(&'a self, collection: &'a str) -> StoreFuture<'a, ()>;
}

/// Filter matching a single identity
pub fn id_query(id: &RecordId) -> Query {
    let mut query = Query::new();
    query.insert(ID_KEY.to_string(), Value::from(id.clone()));
    query
}

/// True when every query entry equals the document's value.
///
/// Numbers compare by value, so `1` matches `1.0`.
pub fn matches(document: &Document, query: &Query) -> bool {
    query.iter().all(|(key, expected)| {
        document
            .get(key)
            .is_some_and(|actual| values_equal(actual, expected))
    })
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_matches() {
        let document = doc(json!({"size": "big", "price": 5, "tags": ["a"]}));

        assert!(matches(&document, &Query::new()));
        assert!(matches(&document, &doc(json!({"size": "big"}))));
        assert!(matches(&document, &doc(json!({"size": "big", "price": 5.0}))));
        assert!(!matches(&document, &doc(json!({"size": "small"}))));
        assert!(!matches(&document, &doc(json!({"color": "red"}))));
        assert!(matches(&document, &doc(json!({"tags": ["a"]}))));
    }

    #[test]
    fn test_id_query() {
        let id = RecordId::new("abc");
        assert_eq!(Value::Object(id_query(&id)), json!({"_id": "abc"}));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(RecordId::generate(), RecordId::generate());
    }

    #[test]
    fn test_record_id_from_json() {
        assert_eq!(RecordId::from_json(&json!("x")), Some(RecordId::new("x")));
        assert_eq!(RecordId::from_json(&json!(3)), None);
    }
}
