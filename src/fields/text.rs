//! Text fields: `char`, `regex`, `email`, `url`
//!
//! Text fields coerce any non-null value to trimmed text before the pipeline
//! runs. Length is counted in Unicode scalar values.

use regex::Regex;

use super::base::{Field, FieldState};
use super::config::FieldConfig;
use super::errors::{FieldError, FieldResult};
use super::rules::{required, rule_names, run_pipeline, Rule, RuleResult};
use super::value::FieldValue;

const TEXT_KEYS: [&str; 3] = ["min_length", "max_length", "blank"];

/// Length and blank limits shared by every text field.
#[derive(Debug, Clone)]
pub struct TextLimits {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub blank: bool,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            blank: true,
        }
    }
}

impl TextLimits {
    fn from_config(field_type: &str, config: &FieldConfig) -> FieldResult<Self> {
        Ok(Self {
            min_length: config.usize(field_type, "min_length")?,
            max_length: config.usize(field_type, "max_length")?,
            blank: config.bool_or(field_type, "blank", true)?,
        })
    }
}

/// Fields that carry text limits, so length rules can be shared.
pub trait TextField: Field {
    fn limits(&self) -> &TextLimits;
}

/// Trims the current value in place.
fn coerce_text(state: &mut FieldState) {
    if !state.value.is_null() {
        state.value = FieldValue::Text(state.value.to_text().trim().to_string());
    }
}

fn text_len(value: &FieldValue) -> Option<usize> {
    value.as_str().map(|s| s.chars().count())
}

fn blank<F: TextField>(field: &F, value: &FieldValue) -> RuleResult {
    if !field.limits().blank && text_len(value) == Some(0) {
        return Err(field.state().failure("blank", "This field can't be empty"));
    }
    Ok(None)
}

fn max_length<F: TextField>(field: &F, value: &FieldValue) -> RuleResult {
    if let (Some(max), Some(len)) = (field.limits().max_length, text_len(value)) {
        if len > max {
            return Err(field
                .state()
                .failure_with("max_length", "Maximum {} characters", max));
        }
    }
    Ok(None)
}

fn min_length<F: TextField>(field: &F, value: &FieldValue) -> RuleResult {
    if let (Some(min), Some(len)) = (field.limits().min_length, text_len(value)) {
        if len < min {
            return Err(field
                .state()
                .failure_with("min_length", "At least {} characters", min));
        }
    }
    Ok(None)
}

/// Free text with optional length limits.
#[derive(Debug, Clone, Default)]
pub struct CharField {
    state: FieldState,
    limits: TextLimits,
}

impl CharField {
    const RULES: &'static [Rule<Self>] = &[
        Rule::new("blank", blank::<Self>),
        Rule::new("max_length", max_length::<Self>),
        Rule::new("min_length", min_length::<Self>),
        Rule::new("required", required::<Self>),
    ];

    pub fn from_config(config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("char", &TEXT_KEYS)?;
        Self::build("char", config)
    }

    fn build(field_type: &str, config: &FieldConfig) -> FieldResult<Self> {
        Ok(Self {
            state: FieldState::from_config(field_type, config)?,
            limits: TextLimits::from_config(field_type, config)?,
        })
    }
}

impl TextField for CharField {
    fn limits(&self) -> &TextLimits {
        &self.limits
    }
}

impl Field for CharField {
    fn type_tag(&self) -> &'static str {
        "char"
    }

    fn state(&self) -> &FieldState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FieldState {
        &mut self.state
    }

    fn clean(&mut self) -> FieldValue {
        coerce_text(&mut self.state);
        run_pipeline(self, Self::RULES)
    }

    fn rule_names(&self) -> Vec<&'static str> {
        rule_names(Self::RULES)
    }

    fn clone_box(&self) -> Box<dyn Field> {
        Box::new(self.clone())
    }
}

/// Email shape: local part, `@`, domain with at least one dot.
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$";

/// Scheme-agnostic URL, anchored end to end.
pub fn url_pattern() -> String {
    // Unicode letters allowed in host labels
    let ul = r"\x{00a1}-\x{ffff}";

    let ipv4 = r"(?:25[0-5]|2[0-4]\d|[0-1]?\d?\d)(?:\.(?:25[0-5]|2[0-4]\d|[0-1]?\d?\d)){3}";
    let ipv6 = r"\[[0-9a-f:.]+\]";

    // Labels never start or end with a hyphen
    let label = format!(r"[a-z{ul}0-9](?:[a-z{ul}0-9-]*[a-z{ul}0-9])?");
    let domain = format!(r"(?:\.(?:{label})?)*");
    let tld = format!(r"\.(?:[a-z{ul}]{{2,}}|xn--[a-z0-9]+)\.?");
    let host = format!("(?:{label}{domain}{tld}|localhost)");

    format!(
        r"(?i)[a-z0-9.\-]*://(?:\S+(?::\S*)?@)?(?:{ipv4}|{ipv6}|{host})(?::\d{{2,5}})?(?:[/?#]\S*)?\z"
    )
}

/// Text that must match a pattern anchored at the start.
///
/// The `email` and `url` types are presets of this field.
#[derive(Debug, Clone)]
pub struct RegexField {
    text: CharField,
    pattern: Regex,
    tag: &'static str,
}

impl RegexField {
    const RULES: &'static [Rule<Self>] = &[
        Rule::new("blank", blank::<Self>),
        Rule::new("max_length", max_length::<Self>),
        Rule::new("min_length", min_length::<Self>),
        Rule::new("regex", regex_rule),
        Rule::new("required", required::<Self>),
    ];

    /// Reads `regex` plus the text keys.
    pub fn from_config(config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("regex", &["regex", "min_length", "max_length", "blank"])?;
        let pattern = config.required_string("regex", "regex")?;
        Self::build("regex", &pattern, config)
    }

    pub fn email(config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("email", &TEXT_KEYS)?;
        Self::build("email", EMAIL_PATTERN, config)
    }

    pub fn url(config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys("url", &TEXT_KEYS)?;
        Self::build("url", &url_pattern(), config)
    }

    fn build(tag: &'static str, pattern: &str, config: &FieldConfig) -> FieldResult<Self> {
        let anchored = format!("^(?:{})", pattern);
        let pattern = Regex::new(&anchored)
            .map_err(|e| FieldError::invalid_config(tag, format!("invalid regex: {}", e)))?;

        Ok(Self {
            text: CharField::build(tag, config)?,
            pattern,
            tag,
        })
    }

    /// The compiled, start-anchored pattern
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

fn regex_rule(field: &RegexField, value: &FieldValue) -> RuleResult {
    match value.as_str() {
        Some(text) if !field.pattern.is_match(text) => {
            Err(field.state().failure("regex", "Regex error"))
        }
        _ => Ok(None),
    }
}

impl TextField for RegexField {
    fn limits(&self) -> &TextLimits {
        &self.text.limits
    }
}

impl Field for RegexField {
    fn type_tag(&self) -> &'static str {
        self.tag
    }

    fn state(&self) -> &FieldState {
        &self.text.state
    }

    fn state_mut(&mut self) -> &mut FieldState {
        &mut self.text.state
    }

    fn clean(&mut self) -> FieldValue {
        coerce_text(&mut self.text.state);
        run_pipeline(self, Self::RULES)
    }

    fn rule_names(&self) -> Vec<&'static str> {
        rule_names(Self::RULES)
    }

    fn clone_box(&self) -> Box<dyn Field> {
        Box::new(self.clone())
    }
}
