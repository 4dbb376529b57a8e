//! Field trait and shared field state

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::config::FieldConfig;
use super::errors::{FieldResult, ValidationFailure};
use super::rules::{required, rule_names, run_pipeline, Rule};
use super::value::FieldValue;

/// A typed, self-validating value holder.
///
/// `clean()` runs the field's rule pipeline over the current value, records at
/// most one error and returns the cleaned value. Validation failures are
/// never returned as errors; callers read them through `is_valid()`/`error()`.
pub trait Field: fmt::Debug + Send + Sync {
    /// Registry tag of the concrete type
    fn type_tag(&self) -> &'static str;

    fn state(&self) -> &FieldState;

    fn state_mut(&mut self) -> &mut FieldState;

    /// Stores a raw value. Validation happens on the next `clean()`.
    fn set_value(&mut self, value: FieldValue) {
        self.state_mut().value = value;
    }

    /// Current value (raw until cleaned)
    fn value(&self) -> &FieldValue {
        &self.state().value
    }

    fn error(&self) -> Option<&str> {
        self.state().error.as_deref()
    }

    /// Runs one clean pass and returns the resulting value.
    fn clean(&mut self) -> FieldValue;

    fn is_valid(&self) -> bool {
        self.state().error.is_none()
    }

    /// Per-element failures of composite fields
    fn element_errors(&self) -> &[ElementError] {
        &[]
    }

    /// Rule names in execution order
    fn rule_names(&self) -> Vec<&'static str>;

    fn clone_box(&self) -> Box<dyn Field>;
}

impl Clone for Box<dyn Field> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// State shared by every field type.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    pub(crate) required: bool,
    pub(crate) value: FieldValue,
    pub(crate) error: Option<String>,
    pub(crate) messages: BTreeMap<String, String>,
}

impl FieldState {
    /// Reads `required`, `default` and `messages`.
    pub fn from_config(field_type: &str, config: &FieldConfig) -> FieldResult<Self> {
        Ok(Self {
            required: config.bool_or(field_type, "required", false)?,
            value: config.default_value(),
            error: None,
            messages: config.messages(field_type)?,
        })
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn messages(&self) -> &BTreeMap<String, String> {
        &self.messages
    }

    /// The override for `rule`, falling back to `default`.
    pub fn message(&self, rule: &str, default: &str) -> String {
        self.messages
            .get(rule)
            .map_or_else(|| default.to_string(), Clone::clone)
    }

    /// Builds a failure for `rule`.
    pub fn failure(&self, rule: &str, default: &str) -> ValidationFailure {
        ValidationFailure::new(self.message(rule, default))
    }

    /// Builds a failure for `rule`, filling `{}` with `param`.
    pub fn failure_with(
        &self,
        rule: &str,
        default: &str,
        param: impl fmt::Display,
    ) -> ValidationFailure {
        ValidationFailure::new(self.message(rule, default).replace("{}", &param.to_string()))
    }
}

/// A failed element of a list field.
///
/// An element that is itself a list carries its own failed elements, so
/// nested failures keep every index down to the failing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementError {
    pub index: usize,
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<ElementError>,
}

impl ElementError {
    pub fn new(index: usize, error: impl Into<String>) -> Self {
        Self {
            index,
            error: error.into(),
            elements: Vec::new(),
        }
    }

    pub(crate) fn from_child(index: usize, child: &dyn Field) -> Self {
        let error = child
            .error()
            .map_or_else(|| "This list has invalid elements".to_string(), str::to_string);
        Self {
            index,
            error,
            elements: child.element_errors().to_vec(),
        }
    }
}

/// Untyped field carrying only the `required` rule.
#[derive(Debug, Clone, Default)]
pub struct BaseField {
    state: FieldState,
}

impl BaseField {
    const RULES: &'static [Rule<Self>] = &[Rule::new("required", required::<Self>)];

    pub fn from_config(config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("field", &[])?;
        Ok(Self {
            state: FieldState::from_config("field", config)?,
        })
    }
}

impl Field for BaseField {
    fn type_tag(&self) -> &'static str {
        "field"
    }

    fn state(&self) -> &FieldState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FieldState {
        &mut self.state
    }

    fn clean(&mut self) -> FieldValue {
        run_pipeline(self, Self::RULES)
    }

    fn rule_names(&self) -> Vec<&'static str> {
        rule_names(Self::RULES)
    }

    fn clone_box(&self) -> Box<dyn Field> {
        Box::new(self.clone())
    }
}
