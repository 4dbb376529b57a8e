//! Named fields and the plain-data view of them

use std::collections::BTreeMap;

use crate::fields::{Field, FieldError, FieldRegistry, FieldResult, FieldSpec, FieldValue};
use crate::store::Document;

/// Field name to spec
pub type FieldSpecs = BTreeMap<String, FieldSpec>;

/// Fields by name, iterated in name order.
///
/// Reads return a field's value and writes go through its `set_value`; the
/// field objects themselves are never replaced.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: BTreeMap<String, Box<dyn Field>>,
}

impl FieldSet {
    /// Build every field in `specs` through `registry`.
    pub fn build(registry: &FieldRegistry, specs: &FieldSpecs) -> FieldResult<Self> {
        let fields = specs
            .iter()
            .map(|(name, spec)| Ok((name.clone(), registry.make_field_from_spec(spec)?)))
            .collect::<FieldResult<_>>()?;
        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> FieldResult<&FieldValue> {
        self.field(name).map(|f| f.value())
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> FieldResult<()> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        field.set_value(value.into());
        Ok(())
    }

    pub fn field(&self, name: &str) -> FieldResult<&dyn Field> {
        self.fields
            .get(name)
            .map(|f| &**f)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Box<dyn Field>)> {
        self.fields.iter_mut().map(|(name, field)| (name.as_str(), field))
    }

    /// Every field's current value as JSON
    pub fn values(&self) -> Document {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.value().to_json()))
            .collect()
    }

    /// Set every field from `document`, null when the key is missing.
    pub fn load(&mut self, document: &Document) {
        for (name, field) in self.fields.iter_mut() {
            let value = document
                .get(name)
                .map(FieldValue::from_json)
                .unwrap_or_default();
            field.set_value(value);
        }
    }
}
