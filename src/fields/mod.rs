//! # Fields
//!
//! Typed, self-validating value holders.
//!
//! A field stores a raw value with `set_value()`. `clean()` coerces it and
//! runs the type's rules in name order, stopping at the first failure, and
//! `is_valid()`/`error()` report the outcome. Field types are looked up by tag
//! in a [`FieldRegistry`], which is how models and lists build their fields
//! from JSON specs.

mod base;
mod boolean;
mod choice;
mod config;
mod datetime;
mod errors;
mod list;
mod numeric;
mod registry;
mod rules;
mod text;
mod value;

pub use base::{BaseField, ElementError, Field, FieldState};
pub use boolean::BooleanField;
pub use choice::ChoiceField;
pub use config::{FieldConfig, FieldSpec, COMMON_KEYS};
pub use datetime::{DateTimeField, DATETIME_FORMAT, DATE_FORMAT};
pub use errors::{FieldError, FieldResult, ValidationFailure};
pub use list::ListField;
pub use numeric::{Bounded, Bounds, FloatField, IntegerField};
pub use registry::{make_field, make_field_from_spec, registry, FieldConstructor, FieldRegistry};
pub use rules::{required, rule_names, Rule, RuleCheck, RuleResult};
pub use text::{url_pattern, CharField, RegexField, TextField, TextLimits, EMAIL_PATTERN};
pub use value::{FieldValue, DATE_KEY};
