//! `choice` field

use super::base::{Field, FieldState};
use super::config::FieldConfig;
use super::errors::{FieldError, FieldResult};
use super::rules::{required, rule_names, run_pipeline, Rule, RuleResult};
use super::value::FieldValue;

/// A value restricted to a fixed list of options.
#[derive(Debug, Clone, Default)]
pub struct ChoiceField {
    state: FieldState,
    choices: Vec<FieldValue>,
}

impl ChoiceField {
    const RULES: &'static [Rule<Self>] = &[
        Rule::new("choice", choice),
        Rule::new("required", required::<Self>),
    ];

    /// Reads `choices`, which must be present.
    pub fn from_config(config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("choice", &["choices"])?;
        let choices = config
            .list("choice", "choices")?
            .ok_or_else(|| FieldError::invalid_config("choice", "missing 'choices'"))?;

        Ok(Self {
            state: FieldState::from_config("choice", config)?,
            choices,
        })
    }

    pub fn with_choices(choices: Vec<FieldValue>) -> Self {
        Self {
            choices,
            ..Self::default()
        }
    }

    pub fn choices(&self) -> &[FieldValue] {
        &self.choices
    }
}

fn choice(field: &ChoiceField, value: &FieldValue) -> RuleResult {
    if !value.is_null() && !field.choices.contains(value) {
        return Err(field
            .state
            .failure_with("choice", "{} isn't a valid option.", value));
    }
    Ok(None)
}

impl Field for ChoiceField {
    fn type_tag(&self) -> &'static str {
        "choice"
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sizes() -> ChoiceField {
        ChoiceField::from_config(&FieldConfig::new().with("choices", json!(["big", "small", 3]))).unwrap()
    }

    #[test]
    fn test_choice() {
        let mut field = sizes();
        field.clean();
        assert!(field.is_valid());

        field.set_value("big".into());
        field.clean();
        assert!(field.is_valid());

        field.set_value("medium".into());
        field.clean();
        assert_eq!(field.error(), Some("medium isn't a valid option."));
    }

    #[test]
    fn test_numeric_choice_compares_by_value() {
        let mut field = sizes();
        field.set_value(FieldValue::Float(3.0));
        field.clean();
        assert!(field.is_valid());
    }

    #[test]
    fn test_choice_before_required() {
        let config = FieldConfig::new()
            .with("choices", json!(["big"]))
            .with("required", true);
        let mut field = ChoiceField::from_config(&config).unwrap();
        field.clean();
        assert_eq!(field.error(), Some("This field is required"));
        assert_eq!(field.rule_names(), vec!["choice", "required"]);
    }

    #[test]
    fn test_choices_required() {
        let err = ChoiceField::from_config(&FieldConfig::new()).unwrap_err();
        assert_eq!(err.code(), "FIELDBIND_INVALID_CONFIG");
    }
}
