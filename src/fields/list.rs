//! `list` field
//!
//! A list of values where each element is validated by its own child field.
//! Children are copies of an element prototype resolved through the registry
//! at construction, so a list of lists is just a list whose prototype is
//! itself a list.

use super::base::{ElementError, Field, FieldState};
use super::config::FieldConfig;
use super::errors::FieldResult;
use super::registry::FieldRegistry;
use super::rules::{required, rule_names, run_pipeline, Rule, RuleResult};
use super::value::FieldValue;

const LIST_KEYS: [&str; 3] = ["field", "field_kwargs", "empty"];

#[derive(Debug, Clone)]
pub struct ListField {
    state: FieldState,
    element: Box<dyn Field>,
    children: Vec<Box<dyn Field>>,
    element_errors: Vec<ElementError>,
    allow_empty: bool,
}

impl ListField {
    const RULES: &'static [Rule<Self>] = &[
        Rule::new("empty", empty),
        Rule::new("list", list),
        Rule::new("required", required::<Self>),
    ];

    /// Reads `field`, `field_kwargs` and `empty`.
    pub fn from_config(registry: &FieldRegistry, config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("list", &LIST_KEYS)?;
        let element_tag = config.required_string("list", "field")?;
        let element_config = config.nested("list", "field_kwargs")?;
        Self::of(registry, &element_tag, &element_config, config)
    }

    /// Builds a list of `element_tag` fields; `config` applies to the list itself.
    pub fn of(
        registry: &FieldRegistry,
        element_tag: &str,
        element_config: &FieldConfig,
        config: &FieldConfig,
    ) -> FieldResult<Self> {
        let element = registry.make_field(element_tag, element_config)?;
        let mut state = FieldState::from_config("list", config)?;
        let default = std::mem::take(&mut state.value);

        let mut field = Self {
            state,
            element,
            children: Vec::new(),
            element_errors: Vec::new(),
            allow_empty: config.bool_or("list", "empty", true)?,
        };
        if !default.is_null() {
            field.set_value(default);
        }
        Ok(field)
    }

    /// The element prototype
    pub fn element(&self) -> &dyn Field {
        &*self.element
    }

    pub fn children(&self) -> &[Box<dyn Field>] {
        &self.children
    }
}

fn empty(field: &ListField, value: &FieldValue) -> RuleResult {
    let is_empty = value.as_list().is_some_and(<[FieldValue]>::is_empty);
    if !field.allow_empty && is_empty {
        return Err(field.state.failure("empty", "This list can't be empty"));
    }
    Ok(None)
}

fn list(field: &ListField, value: &FieldValue) -> RuleResult {
    if !value.is_null() && value.as_list().is_none() {
        return Err(field.state.failure("list", "This field must be a list"));
    }
    Ok(None)
}

impl Field for ListField {
    fn type_tag(&self) -> &'static str {
        "list"
    }

    fn state(&self) -> &FieldState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FieldState {
        &mut self.state
    }

    /// Rebuilds one child per element; non-list values get no children.
    fn set_value(&mut self, value: FieldValue) {
        self.children = value
            .as_list()
            .unwrap_or_default()
            .iter()
            .map(|item| {
                let mut child = self.element.clone();
                child.set_value(item.clone());
                child
            })
            .collect();
        self.state.value = value;
    }

    fn clean(&mut self) -> FieldValue {
        self.element_errors.clear();
        run_pipeline(self, Self::RULES);

        let mut cleaned = Vec::with_capacity(self.children.len());
        for (index, child) in self.children.iter_mut().enumerate() {
            cleaned.push(child.clean());
            if !child.is_valid() {
                self.element_errors
                    .push(ElementError::from_child(index, &**child));
            }
        }

        if let FieldValue::List(items) = &mut self.state.value {
            for (slot, value) in items.iter_mut().zip(cleaned) {
                *slot = value;
            }
        }
        self.state.value.clone()
    }

    fn is_valid(&self) -> bool {
        self.state.error.is_none() && self.element_errors.is_empty()
    }

    fn element_errors(&self) -> &[ElementError] {
        &self.element_errors
    }

    fn rule_names(&self) -> Vec<&'static str> {
        rule_names(Self::RULES)
    }

    fn clone_box(&self) -> Box<dyn Field> {
        Box::new(self.clone())
    }
}
