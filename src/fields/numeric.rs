//! Numeric fields: `int` and `float`
//!
//! Coercion runs before the pipeline. A value that cannot be parsed records
//! the `not_num` error and the pipeline is skipped entirely, so `required`,
//! `min` and `max` never see unparseable input.

use std::cmp::Ordering;

use tracing::trace;

use super::base::{Field, FieldState};
use super::config::FieldConfig;
use super::errors::FieldResult;
use super::rules::{required, rule_names, run_pipeline, Rule, RuleResult};
use super::value::FieldValue;

const NUMERIC_KEYS: [&str; 2] = ["min", "max"];

const NOT_NUM: &str = "This isn't a num";

/// Inclusive bounds; each one is checked only when configured.
#[derive(Debug, Clone, Default)]
pub struct Bounds {
    pub min: Option<FieldValue>,
    pub max: Option<FieldValue>,
}

impl Bounds {
    fn from_config(field_type: &str, config: &FieldConfig) -> FieldResult<Self> {
        Ok(Self {
            min: config.number(field_type, "min")?,
            max: config.number(field_type, "max")?,
        })
    }
}

/// Fields with numeric bounds.
pub trait Bounded: Field {
    fn bounds(&self) -> &Bounds;
}

fn max<F: Bounded>(field: &F, value: &FieldValue) -> RuleResult {
    if let Some(bound) = &field.bounds().max {
        if value.numeric_cmp(bound) == Some(Ordering::Greater) {
            return Err(field
                .state()
                .failure_with("max", "The number must be less than {}", bound));
        }
    }
    Ok(None)
}

fn min<F: Bounded>(field: &F, value: &FieldValue) -> RuleResult {
    if let Some(bound) = &field.bounds().min {
        if value.numeric_cmp(bound) == Some(Ordering::Less) {
            return Err(field
                .state()
                .failure_with("min", "The number must be greater than {}", bound));
        }
    }
    Ok(None)
}

/// Integer parse: text is truncated at the decimal point, floats toward zero.
/// Floats outside the `i64` range do not parse.
fn coerce_integer(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Int(i) => Some(*i),
        FieldValue::Float(f) => {
            let whole = f.trunc();
            // i64::MAX rounds up to 2^63, which is already out of range.
            (whole >= i64::MIN as f64 && whole < i64::MAX as f64).then_some(whole as i64)
        }
        FieldValue::Bool(b) => Some(i64::from(*b)),
        FieldValue::Text(s) => {
            let s = s.trim();
            let whole = s.split_once('.').map_or(s, |(whole, _)| whole);
            whole.trim().parse().ok()
        }
        _ => None,
    }
}

/// Float parse. NaN and infinities do not parse.
fn coerce_float(value: &FieldValue) -> Option<f64> {
    let number = match value {
        FieldValue::Int(i) => *i as f64,
        FieldValue::Float(f) => *f,
        FieldValue::Bool(b) => f64::from(u8::from(*b)),
        FieldValue::Text(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Applies `coerce` to a non-null value. Returns false on parse failure,
/// after recording the `not_num` error.
fn coerce_number(
    field_type: &str,
    state: &mut FieldState,
    coerce: impl Fn(&FieldValue) -> Option<FieldValue>,
) -> bool {
    if state.value.is_null() {
        return true;
    }
    match coerce(&state.value) {
        Some(number) => {
            state.value = number;
            true
        }
        None => {
            trace!(field_type, "numeric coercion failed");
            state.error = Some(state.message("not_num", NOT_NUM));
            false
        }
    }
}

/// Whole numbers with optional bounds.
#[derive(Debug, Clone, Default)]
pub struct IntegerField {
    state: FieldState,
    bounds: Bounds,
}

impl IntegerField {
    const RULES: &'static [Rule<Self>] = &[
        Rule::new("max", max::<Self>),
        Rule::new("min", min::<Self>),
        Rule::new("required", required::<Self>),
    ];

    pub fn from_config(config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("int", &NUMERIC_KEYS)?;
        Ok(Self {
            state: FieldState::from_config("int", config)?,
            bounds: Bounds::from_config("int", config)?,
        })
    }
}

impl Bounded for IntegerField {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }
}

impl Field for IntegerField {
    fn type_tag(&self) -> &'static str {
        "int"
    }

    fn state(&self) -> &FieldState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FieldState {
        &mut self.state
    }

    fn clean(&mut self) -> FieldValue {
        let parsed = coerce_number("int", &mut self.state, |v| {
            coerce_integer(v).map(FieldValue::Int)
        });
        if !parsed {
            return self.state.value.clone();
        }
        run_pipeline(self, Self::RULES)
    }

    fn rule_names(&self) -> Vec<&'static str> {
        rule_names(Self::RULES)
    }

    fn clone_box(&self) -> Box<dyn Field> {
        Box::new(self.clone())
    }
}

/// Floating-point numbers with optional bounds.
#[derive(Debug, Clone, Default)]
pub struct FloatField {
    state: FieldState,
    bounds: Bounds,
}

impl FloatField {
    const RULES: &'static [Rule<Self>] = &[
        Rule::new("max", max::<Self>),
        Rule::new("min", min::<Self>),
        Rule::new("required", required::<Self>),
    ];

    pub fn from_config(config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("float", &NUMERIC_KEYS)?;
        Ok(Self {
            state: FieldState::from_config("float", config)?,
            bounds: Bounds::from_config("float", config)?,
        })
    }
}

impl Bounded for FloatField {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }
}

impl Field for FloatField {
    fn type_tag(&self) -> &'static str {
        "float"
    }

    fn state(&self) -> &FieldState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FieldState {
        &mut self.state
    }

    fn clean(&mut self) -> FieldValue {
        let parsed = coerce_number("float", &mut self.state, |v| {
            coerce_float(v).map(FieldValue::Float)
        });
        if !parsed {
            return self.state.value.clone();
        }
        run_pipeline(self, Self::RULES)
    }

    fn rule_names(&self) -> Vec<&'static str> {
        rule_names(Self::RULES)
    }

    fn clone_box(&self) -> Box<dyn Field> {
        Box::new(self.clone())
    }
}
