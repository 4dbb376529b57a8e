//! # Model
//!
//! A named set of fields bound to one store collection.
//!
//! A model is built from field specs, always carrying two implicit fields:
//! `created_at` (set at construction) and `last_updates` (one timestamp
//! appended per update). Values go in and out through `get`/`set`,
//! `is_valid()` cleans every field and fills the error report, and
//! `save`/`fetch`/`remove`/`find` talk to the store.
//!
//! Saving never validates. Call `is_valid()` first.

mod errors;
mod fieldset;
mod spec;
mod validation;

use std::sync::Arc;

use chrono::Local;
use tracing::debug;

use crate::fields::{registry, Field, FieldRegistry, FieldSpec, FieldValue};
use crate::store::{id_query, Collection, Document, Query, RecordId, Store, ID_KEY};

pub use errors::{ConfigError, ModelError, ModelResult};
pub use fieldset::{FieldSet, FieldSpecs};
pub use spec::ModelSpec;
pub use validation::{validate, ErrorReport, FieldReport};

/// Set once at construction
pub const CREATED_AT: &str = "created_at";

/// Timestamps of every update after the first insert
pub const LAST_UPDATES: &str = "last_updates";

/// Merges the implicit fields into `specs`, replacing same-named entries.
fn with_implicit_fields(mut specs: FieldSpecs) -> FieldSpecs {
    specs.insert(CREATED_AT.to_string(), FieldSpec::new("datetime"));
    specs.insert(
        LAST_UPDATES.to_string(),
        FieldSpec::new("list").with("field", "datetime"),
    );
    specs
}

fn now() -> FieldValue {
    FieldValue::DateTime(Local::now().naive_local())
}

/// A record: identity, fields and the last validation report.
#[derive(Debug, Clone)]
pub struct Model {
    id: Option<RecordId>,
    collection: Collection,
    fields: FieldSet,
    errors: ErrorReport,
}

impl Model {
    /// Build a model with fields from the process-wide registry.
    pub fn new(
        store: Arc<dyn Store>,
        collection: impl Into<Arc<str>>,
        specs: FieldSpecs,
    ) -> ModelResult<Self> {
        Self::with_registry(registry(), store, collection, specs)
    }

    pub fn with_registry(
        registry: &FieldRegistry,
        store: Arc<dyn Store>,
        collection: impl Into<Arc<str>>,
        specs: FieldSpecs,
    ) -> ModelResult<Self> {
        let collection = Collection::new(store, collection);
        let mut fields = FieldSet::build(registry, &with_implicit_fields(specs))?;
        fields.set(CREATED_AT, now())?;

        debug!(
            collection = collection.name(),
            fields = fields.len(),
            "model built"
        );

        Ok(Self {
            id: None,
            collection,
            fields,
            errors: ErrorReport::new(),
        })
    }

    /// Current value of a field
    pub fn get(&self, name: &str) -> ModelResult<&FieldValue> {
        Ok(self.fields.get(name)?)
    }

    /// Hands `value` to the field's `set_value`.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> ModelResult<()> {
        Ok(self.fields.set(name, value)?)
    }

    /// The field object itself, for its error or element errors
    pub fn field(&self, name: &str) -> ModelResult<&dyn Field> {
        Ok(self.fields.field(name)?)
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }

    /// The collection handle, for queries beyond this record
    pub fn queryset(&self) -> &Collection {
        &self.collection
    }

    /// Plain data: every field's value plus `_id` when set.
    pub fn to_document(&self) -> Document {
        let mut document = self.fields.values();
        if let Some(id) = &self.id {
            document.insert(ID_KEY.to_string(), id.clone().into());
        }
        document
    }

    /// Replace identity and every field from `document`.
    pub fn set_data(&mut self, document: &Document) {
        self.id = document.get(ID_KEY).and_then(RecordId::from_json);
        self.fields.load(document);
    }

    /// Clean every field and rebuild the error report.
    pub fn is_valid(&mut self) -> bool {
        self.errors = validate(&mut self.fields);
        self.errors.is_empty()
    }

    /// Report from the last `is_valid()`
    pub fn errors(&self) -> &ErrorReport {
        &self.errors
    }

    /// Insert on first save, update afterwards.
    ///
    /// An update appends the current time to `last_updates` first.
    pub async fn save(&mut self) -> ModelResult<()> {
        match self.id.clone() {
            None => {
                let id = self.collection.insert(self.to_document()).await?;
                debug!(collection = self.collection.name(), id = %id, "record inserted");
                self.id = Some(id);
            }
            Some(id) => {
                self.touch()?;
                self.collection.update(&id, self.to_document()).await?;
                debug!(collection = self.collection.name(), id = %id, "record updated");
            }
        }
        Ok(())
    }

    fn touch(&mut self) -> ModelResult<()> {
        let mut updates = match self.fields.get(LAST_UPDATES)? {
            FieldValue::List(items) => items.clone(),
            _ => Vec::new(),
        };
        updates.push(now());
        self.set(LAST_UPDATES, FieldValue::List(updates))
    }

    /// Load the first record matching `query`.
    ///
    /// Returns false and resets the model to an empty state (no identity,
    /// every field null) when nothing matches.
    pub async fn fetch(&mut self, query: &Query) -> ModelResult<bool> {
        let document = self.collection.find_one(query).await?;
        let found = document.is_some();
        self.set_data(&document.unwrap_or_default());
        debug!(
            collection = self.collection.name(),
            found,
            "record fetched"
        );
        Ok(found)
    }

    /// Delete this record from the store and clear the identity.
    pub async fn remove(&mut self) -> ModelResult<()> {
        let id = self.id.clone().ok_or(ModelError::MissingIdentity)?;
        self.collection.remove(&id_query(&id)).await?;
        debug!(collection = self.collection.name(), id = %id, "record removed");
        self.id = None;
        Ok(())
    }

    /// Every record matching `query`, each bound to a copy of this model.
    pub async fn find(&self, query: &Query) -> ModelResult<ModelList> {
        let documents = self.collection.find(query).await?;
        Ok(documents
            .iter()
            .map(|document| {
                let mut model = self.blank();
                model.set_data(document);
                model
            })
            .collect())
    }

    fn blank(&self) -> Self {
        Self {
            id: None,
            collection: self.collection.clone(),
            fields: self.fields.clone(),
            errors: ErrorReport::new(),
        }
    }
}

/// Ordered models, as handed to a presentation layer
#[derive(Debug, Clone, Default)]
pub struct ModelList(Vec<Model>);

impl ModelList {
    /// Each model's plain data, in order
    pub fn documents(&self) -> Vec<Document> {
        self.0.iter().map(Model::to_document).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Model> {
        self.0
    }
}

impl FromIterator<Model> for ModelList {
    fn from_iter<I: IntoIterator<Item = Model>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ModelList {
    type Item = Model;
    type IntoIter = std::vec::IntoIter<Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn tapioca(store: Arc<dyn Store>) -> Model {
        let mut specs = FieldSpecs::new();
        specs.insert(
            "size".into(),
            FieldSpec::new("choice")
                .with("choices", json!(["big", "small"]))
                .with("required", true),
        );
        specs.insert("price".into(), FieldSpec::new("float").with("min", 0));
        Model::new(store, "tapiocas", specs).unwrap()
    }

    fn query(value: serde_json::Value) -> Query {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_implicit_fields() {
        let model = tapioca(Arc::new(MemoryStore::new()));
        assert!(model.get(CREATED_AT).unwrap().as_datetime().is_some());
        assert!(model.get(LAST_UPDATES).unwrap().is_null());
        assert_eq!(model.field(LAST_UPDATES).unwrap().type_tag(), "list");
        assert_eq!(model.collection_name(), "tapiocas");
    }

    #[test]
    fn test_errors_reset_each_pass() {
        let mut model = tapioca(Arc::new(MemoryStore::new()));
        assert!(!model.is_valid());
        assert_eq!(model.errors()["size"].message(), Some("This field is required"));

        model.set("size", "big").unwrap();
        assert!(model.is_valid());
        assert!(model.errors().is_empty());
    }

    #[test]
    fn test_document_has_id_only_when_set() {
        let mut model = tapioca(Arc::new(MemoryStore::new()));
        assert!(!model.to_document().contains_key(ID_KEY));

        model.set_data(&query(json!({"_id": "abc", "size": "small"})));
        assert_eq!(model.id(), Some(&RecordId::new("abc")));
        assert_eq!(model.to_document()[ID_KEY], json!("abc"));
        assert!(model.get(CREATED_AT).unwrap().is_null());
    }

    #[tokio::test]
    async fn test_save_then_update_appends_timestamp() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let mut model = tapioca(Arc::clone(&store));
        model.set("size", "big").unwrap();

        model.save().await.unwrap();
        assert!(model.id().is_some());
        assert!(model.get(LAST_UPDATES).unwrap().is_null());

        model.set("price", 4.5).unwrap();
        model.save().await.unwrap();
        model.save().await.unwrap();
        assert_eq!(model.get(LAST_UPDATES).unwrap().as_list().map(<[FieldValue]>::len), Some(2));
        assert_eq!(model.queryset().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_miss_resets() {
        let mut model = tapioca(Arc::new(MemoryStore::new()));
        model.set("size", "big").unwrap();
        model.save().await.unwrap();

        let found = model.fetch(&query(json!({"size": "small"}))).await.unwrap();
        assert!(!found);
        assert_eq!(model.id(), None);
        assert!(model.get("size").unwrap().is_null());
    }

    #[tokio::test]
    async fn test_remove() {
        let mut model = tapioca(Arc::new(MemoryStore::new()));
        assert_eq!(model.remove().await.unwrap_err(), ModelError::MissingIdentity);

        model.set("size", "big").unwrap();
        model.save().await.unwrap();
        model.remove().await.unwrap();
        assert_eq!(model.id(), None);
        assert_eq!(model.queryset().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        for size in ["big", "small", "big"] {
            let mut model = tapioca(Arc::clone(&store));
            model.set("size", size).unwrap();
            model.save().await.unwrap();
        }

        let model = tapioca(store);
        let bigs = model.find(&query(json!({"size": "big"}))).await.unwrap();
        assert_eq!(bigs.len(), 2);
        assert!(bigs.iter().all(|m| m.id().is_some()));

        let documents = bigs.documents();
        assert!(documents.iter().all(|d| d["size"] == json!("big")));
    }
}
