//! Rule pipeline
//!
//! Each field type declares its rules as a static slice of `(name, check)`
//! pairs sorted by name. The driver runs them in slice order and stops at the
//! first failure, so when two rules would both fail, the one whose name sorts
//! first is reported (`blank` before `max_length`, `empty` before `required`).

use tracing::trace;

use super::base::Field;
use super::errors::ValidationFailure;
use super::value::FieldValue;

/// Outcome of one rule: `Ok(None)` keeps the value, `Ok(Some(v))` replaces it.
pub type RuleResult = Result<Option<FieldValue>, ValidationFailure>;

pub type RuleCheck<F> = fn(&F, &FieldValue) -> RuleResult;

/// A named check applied to a field's current value.
pub struct Rule<F> {
    pub name: &'static str,
    pub check: RuleCheck<F>,
}

impl<F> Rule<F> {
    pub const fn new(name: &'static str, check: RuleCheck<F>) -> Self {
        Self { name, check }
    }
}

/// Runs one clean pass over `rules` and returns the resulting value.
///
/// Resets the field error first. On failure the value keeps whatever the
/// previous rule produced and no later rule runs.
pub(crate) fn run_pipeline<F: Field>(field: &mut F, rules: &[Rule<F>]) -> FieldValue {
    let mut value = std::mem::take(&mut field.state_mut().value);
    let mut error = None;

    for rule in rules {
        match (rule.check)(field, &value) {
            Ok(Some(next)) => value = next,
            Ok(None) => {}
            Err(failure) => {
                trace!(field_type = field.type_tag(), rule = rule.name, "rule failed");
                error = Some(failure.into_message());
                break;
            }
        }
    }

    let state = field.state_mut();
    state.value = value;
    state.error = error;
    state.value.clone()
}

/// Fails when the field is required and holds no value.
pub fn required<F: Field>(field: &F, value: &FieldValue) -> RuleResult {
    if field.state().is_required() && value.is_null() {
        return Err(field.state().failure("required", "This field is required"));
    }
    Ok(None)
}

/// Names of a rule slice, in execution order.
pub fn rule_names<F>(rules: &[Rule<F>]) -> Vec<&'static str> {
    rules.iter().map(|rule| rule.name).collect()
}
