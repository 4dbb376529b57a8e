//! Model Store Tests
//!
//! Models bound to the in-memory store:
//! - Values survive save and fetch, date-times included
//! - Updates append to `last_updates`
//! - Remove needs an identity
//! - Specs load from files and reject bad field definitions

use std::io::Write;
use std::sync::Arc;

use fieldbind::fields::{FieldSpec, FieldValue};
use fieldbind::model::{FieldSpecs, Model, ModelError, ModelSpec, CREATED_AT, LAST_UPDATES};
use fieldbind::store::{MemoryStore, Query, Store};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

// =============================================================================
// Helper Functions
// =============================================================================

fn tapioca_specs() -> FieldSpecs {
    let mut specs = FieldSpecs::new();
    specs.insert(
        "size".into(),
        FieldSpec::new("choice")
            .with("choices", json!(["big", "small"]))
            .with("required", true),
    );
    specs.insert("filling".into(), FieldSpec::new("char").with("max_length", 20));
    specs.insert("price".into(), FieldSpec::new("float").with("min", 0));
    specs.insert("vegan".into(), FieldSpec::new("boolean"));
    specs.insert(
        "contacts".into(),
        FieldSpec::new("list").with("field", "email"),
    );
    specs
}

fn new_store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

fn query(value: Value) -> Query {
    value.as_object().cloned().unwrap()
}

// =============================================================================
// Round Trip
// =============================================================================

#[tokio::test]
async fn test_save_then_fetch_round_trip() {
    let store = new_store();

    let mut tapioca = Model::new(Arc::clone(&store), "tapiocas", tapioca_specs()).unwrap();
    tapioca.set("size", "big").unwrap();
    tapioca.set("filling", "  coconut  ").unwrap();
    tapioca.set("price", "4.5").unwrap();
    tapioca.set("vegan", true).unwrap();
    tapioca.set("contacts", vec!["ana@example.com"]).unwrap();

    assert!(tapioca.is_valid(), "errors: {:?}", tapioca.errors());
    tapioca.save().await.unwrap();
    let created_at = tapioca.get(CREATED_AT).unwrap().clone();

    let mut loaded = Model::new(store, "tapiocas", tapioca_specs()).unwrap();
    assert!(loaded.fetch(&query(json!({"filling": "coconut"}))).await.unwrap());

    assert_eq!(loaded.id(), tapioca.id());
    assert!(loaded.id().is_some());
    assert_eq!(loaded.get("size").unwrap(), &FieldValue::from("big"));
    assert_eq!(loaded.get("filling").unwrap(), &FieldValue::from("coconut"));
    assert_eq!(loaded.get("price").unwrap(), &FieldValue::Float(4.5));
    assert_eq!(loaded.get("vegan").unwrap(), &FieldValue::Bool(true));
    assert_eq!(loaded.get(CREATED_AT).unwrap(), &created_at);
    assert!(loaded.is_valid());
}

#[tokio::test]
async fn test_fetch_miss_leaves_empty_model() {
    let mut model = Model::new(new_store(), "tapiocas", tapioca_specs()).unwrap();
    model.set("size", "big").unwrap();

    assert!(!model.fetch(&query(json!({"size": "small"}))).await.unwrap());
    assert!(model.id().is_none());
    assert!(model.get("size").unwrap().is_null());
}

// =============================================================================
// Updates
// =============================================================================

#[tokio::test]
async fn test_update_keeps_identity_and_history() {
    let store = new_store();
    let mut model = Model::new(Arc::clone(&store), "tapiocas", tapioca_specs()).unwrap();
    model.set("size", "small").unwrap();
    model.save().await.unwrap();
    let id = model.id().cloned();

    model.set("size", "big").unwrap();
    model.save().await.unwrap();

    assert_eq!(model.id().cloned(), id);
    assert_eq!(model.queryset().count().await.unwrap(), 1);

    let mut loaded = Model::new(store, "tapiocas", tapioca_specs()).unwrap();
    assert!(loaded.fetch(&query(json!({"size": "big"}))).await.unwrap());
    let history = loaded.get(LAST_UPDATES).unwrap().as_list().unwrap().to_vec();
    assert_eq!(history.len(), 1);
    assert!(history[0].as_datetime().is_some());
}

/// Saving does not validate; that is the caller's job.
#[tokio::test]
async fn test_save_does_not_validate() {
    let mut model = Model::new(new_store(), "tapiocas", tapioca_specs()).unwrap();
    model.set("size", "medium").unwrap();

    assert!(!model.is_valid());
    model.save().await.unwrap();
    assert!(model.id().is_some());
}

// =============================================================================
// Remove and Find
// =============================================================================

#[tokio::test]
async fn test_remove_requires_identity() {
    let mut model = Model::new(new_store(), "tapiocas", tapioca_specs()).unwrap();
    let err = model.remove().await.unwrap_err();
    assert_eq!(err, ModelError::MissingIdentity);
}

#[tokio::test]
async fn test_remove_only_this_record() {
    let store = new_store();
    let mut first = Model::new(Arc::clone(&store), "tapiocas", tapioca_specs()).unwrap();
    first.set("size", "big").unwrap();
    first.save().await.unwrap();

    let mut second = Model::new(Arc::clone(&store), "tapiocas", tapioca_specs()).unwrap();
    second.set("size", "big").unwrap();
    second.save().await.unwrap();

    first.remove().await.unwrap();
    assert!(first.id().is_none());
    assert_eq!(second.queryset().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_find_returns_model_list() {
    let store = new_store();
    for (size, price) in [("big", 5), ("small", 3), ("big", 7)] {
        let mut model = Model::new(Arc::clone(&store), "tapiocas", tapioca_specs()).unwrap();
        model.set("size", size).unwrap();
        model.set("price", price).unwrap();
        model.save().await.unwrap();
    }

    let model = Model::new(store, "tapiocas", tapioca_specs()).unwrap();
    let bigs = model.find(&query(json!({"size": "big"}))).await.unwrap();
    assert_eq!(bigs.len(), 2);

    let prices: Vec<Value> = bigs.documents().iter().map(|d| d["price"].clone()).collect();
    assert_eq!(prices, vec![json!(5), json!(7)]);
}

// =============================================================================
// Model Specs
// =============================================================================

#[tokio::test]
async fn test_spec_file_builds_models() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"collection": "tapiocas",
            "fields": {{"size": {{"type": "choice", "choices": ["big"], "required": true}}}}}}"#
    )
    .unwrap();

    let spec = ModelSpec::load(file.path()).unwrap();
    let mut model = spec.build(new_store()).unwrap();
    assert_eq!(model.collection_name(), "tapiocas");

    assert!(!model.is_valid());
    model.set("size", "big").unwrap();
    assert!(model.is_valid());
    model.save().await.unwrap();
}

#[test]
fn test_spec_with_unknown_type_fails_to_load() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"collection": "c", "fields": {{"size": {{"type": "sized"}}}}}}"#).unwrap();

    let err = ModelSpec::load(file.path()).unwrap_err();
    assert_eq!(err.code(), "FIELDBIND_CONFIG_INVALID");
}

#[test]
fn test_unknown_field_access() {
    let mut model = Model::new(new_store(), "tapiocas", tapioca_specs()).unwrap();
    assert!(model.get("flavour").is_err());
    assert_eq!(
        model.set("flavour", "coco").unwrap_err().code(),
        "FIELDBIND_UNKNOWN_FIELD"
    );
}
