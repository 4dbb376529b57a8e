//! `boolean` field
//!
//! A boolean always holds a value: it starts as `false`, stores the
//! truthiness of whatever it is given and ignores `required` and `default`.

use super::base::{Field, FieldState};
use super::config::FieldConfig;
use super::errors::FieldResult;
use super::rules::{required, rule_names, run_pipeline, Rule};
use super::value::FieldValue;

#[derive(Debug, Clone)]
pub struct BooleanField {
    state: FieldState,
}

impl Default for BooleanField {
    fn default() -> Self {
        Self {
            state: FieldState {
                required: true,
                value: FieldValue::Bool(false),
                ..FieldState::default()
            },
        }
    }
}

impl BooleanField {
    const RULES: &'static [Rule<Self>] = &[Rule::new("required", required::<Self>)];

    pub fn from_config(config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("boolean", &[])?;
        let mut field = Self::default();
        field.state.messages = config.messages("boolean")?;
        Ok(field)
    }
}

impl Field for BooleanField {
    fn type_tag(&self) -> &'static str {
        "boolean"
    }

    fn state(&self) -> &FieldState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FieldState {
        &mut self.state
    }

    fn set_value(&mut self, value: FieldValue) {
        self.state.value = FieldValue::Bool(value.is_truthy());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool() {
        let mut field = BooleanField::default();
        assert_eq!(field.clean(), FieldValue::Bool(false));
        assert!(field.is_valid());

        field.set_value(FieldValue::Bool(true));
        assert_eq!(field.clean(), FieldValue::Bool(true));
        assert!(field.is_valid());
    }

    #[test]
    fn test_truthiness() {
        let mut field = BooleanField::default();
        for (raw, expected) in [
            (FieldValue::from("yes"), true),
            (FieldValue::from(""), false),
            (FieldValue::Int(0), false),
            (FieldValue::Int(2), true),
            (FieldValue::Null, false),
            (FieldValue::List(vec![]), false),
        ] {
            field.set_value(raw);
            assert_eq!(field.clean(), FieldValue::Bool(expected));
            assert!(field.is_valid());
        }
    }

    #[test]
    fn test_required_and_default_ignored() {
        let config = FieldConfig::new().with("required", false).with("default", true);
        let field = BooleanField::from_config(&config).unwrap();
        assert!(field.state().is_required());
        assert_eq!(field.value(), &FieldValue::Bool(false));
    }
}
