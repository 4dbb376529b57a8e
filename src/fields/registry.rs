//! # Field Type Registry
//!
//! Maps type tags to constructors. The process-wide registry is created on
//! first use with the built-in types and can be extended at runtime.

use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use tracing::warn;

use super::base::Field;
use super::boolean::BooleanField;
use super::choice::ChoiceField;
use super::config::{FieldConfig, FieldSpec};
use super::datetime::DateTimeField;
use super::errors::{FieldError, FieldResult};
use super::list::ListField;
use super::numeric::{FloatField, IntegerField};
use super::text::{CharField, RegexField};

/// Builds a field from keyword configuration.
///
/// The registry is passed in so composite fields resolve their elements
/// through the same registry they were built from.
pub type FieldConstructor = fn(&FieldRegistry, &FieldConfig) -> FieldResult<Box<dyn Field>>;

fn boxed<F: Field + 'static>(field: FieldResult<F>) -> FieldResult<Box<dyn Field>> {
    field.map(|f| Box::new(f) as Box<dyn Field>)
}

/// Registry of field constructors by type tag
#[derive(Default)]
pub struct FieldRegistry {
    constructors: RwLock<HashMap<String, FieldConstructor>>,
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

impl FieldRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in types
    pub fn with_builtins() -> Self {
        let builtins: [(&str, FieldConstructor); 10] = [
            ("char", |_, c| boxed(CharField::from_config(c))),
            ("int", |_, c| boxed(IntegerField::from_config(c))),
            ("float", |_, c| boxed(FloatField::from_config(c))),
            ("boolean", |_, c| boxed(BooleanField::from_config(c))),
            ("choice", |_, c| boxed(ChoiceField::from_config(c))),
            ("datetime", |_, c| boxed(DateTimeField::from_config(c))),
            ("date", |_, c| boxed(DateTimeField::date(c))),
            ("regex", |_, c| boxed(RegexField::from_config(c))),
            ("email", |_, c| boxed(RegexField::email(c))),
            ("url", |_, c| boxed(RegexField::url(c))),
        ];

        let mut constructors: HashMap<String, FieldConstructor> = builtins
            .into_iter()
            .map(|(tag, constructor)| (tag.to_string(), constructor))
            .collect();
        constructors.insert("list".to_string(), |r, c| boxed(ListField::from_config(r, c)));

        Self {
            constructors: RwLock::new(constructors),
        }
    }

    /// Register a constructor, replacing any previous one for the tag
    pub fn register(&self, type_tag: impl Into<String>, constructor: FieldConstructor) -> FieldResult<()> {
        let type_tag = type_tag.into();
        let mut constructors = self
            .constructors
            .write()
            .map_err(|_| FieldError::RegistryPoisoned)?;

        if constructors.insert(type_tag.clone(), constructor).is_some() {
            warn!(type_tag = %type_tag, "field type re-registered");
        }
        Ok(())
    }

    /// Get the constructor for a tag
    pub fn get(&self, type_tag: &str) -> FieldResult<FieldConstructor> {
        let constructors = self
            .constructors
            .read()
            .map_err(|_| FieldError::RegistryPoisoned)?;
        constructors
            .get(type_tag)
            .copied()
            .ok_or_else(|| FieldError::UnknownFieldType(type_tag.to_string()))
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.constructors
            .read()
            .map(|c| c.contains_key(type_tag))
            .unwrap_or(false)
    }

    /// Construct a field of the given type.
    ///
    /// The constructor is copied out before it runs, so nested construction
    /// never re-enters the lock.
    pub fn make_field(&self, type_tag: &str, config: &FieldConfig) -> FieldResult<Box<dyn Field>> {
        let constructor = self.get(type_tag)?;
        constructor(self, config)
    }

    pub fn make_field_from_spec(&self, spec: &FieldSpec) -> FieldResult<Box<dyn Field>> {
        self.make_field(&spec.type_tag, &spec.config)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .constructors
            .read()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        tags.sort();
        tags
    }
}

/// The process-wide registry, initialized with the built-ins on first use.
pub fn registry() -> &'static FieldRegistry {
    static REGISTRY: OnceLock<FieldRegistry> = OnceLock::new();
    REGISTRY.get_or_init(FieldRegistry::with_builtins)
}

/// Construct a field through the process-wide registry.
pub fn make_field(type_tag: &str, config: &FieldConfig) -> FieldResult<Box<dyn Field>> {
    registry().make_field(type_tag, config)
}

pub fn make_field_from_spec(spec: &FieldSpec) -> FieldResult<Box<dyn Field>> {
    registry().make_field_from_spec(spec)
}
