//! Aggregate validation over a field set

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::fieldset::FieldSet;
use crate::fields::ElementError;

/// What went wrong with one field.
///
/// Serializes as a plain message, or as a list of `{index, error}` for a list
/// whose own rules passed but whose elements did not. Nested lists add an
/// `elements` list of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldReport {
    Message(String),
    Elements(Vec<ElementError>),
}

impl FieldReport {
    pub fn message(&self) -> Option<&str> {
        match self {
            FieldReport::Message(m) => Some(m),
            FieldReport::Elements(_) => None,
        }
    }

    pub fn elements(&self) -> &[ElementError] {
        match self {
            FieldReport::Message(_) => &[],
            FieldReport::Elements(e) => e,
        }
    }
}

/// Field name to report, for invalid fields only
pub type ErrorReport = BTreeMap<String, FieldReport>;

/// Clean every field and report the invalid ones.
pub fn validate(fields: &mut FieldSet) -> ErrorReport {
    let mut report = ErrorReport::new();

    for (name, field) in fields.iter_mut() {
        field.clean();
        if field.is_valid() {
            continue;
        }
        let entry = match field.error() {
            Some(message) => FieldReport::Message(message.to_string()),
            None => FieldReport::Elements(field.element_errors().to_vec()),
        };
        report.insert(name.to_string(), entry);
    }

    debug!(invalid = report.len(), "validation finished");
    report
}
