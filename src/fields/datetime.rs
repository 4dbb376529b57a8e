//! `datetime` and `date` fields

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};

use super::base::{Field, FieldState};
use super::config::FieldConfig;
use super::errors::{FieldError, FieldResult};
use super::rules::{required, rule_names, run_pipeline, Rule, RuleResult};
use super::value::FieldValue;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-time parsed from text with a strftime pattern.
///
/// `date` is the same field with a date-only default pattern; parsed dates
/// land at midnight.
#[derive(Debug, Clone)]
pub struct DateTimeField {
    state: FieldState,
    format: String,
    tag: &'static str,
}

impl Default for DateTimeField {
    fn default() -> Self {
        Self {
            state: FieldState::default(),
            format: DATETIME_FORMAT.to_string(),
            tag: "datetime",
        }
    }
}

impl DateTimeField {
    const RULES: &'static [Rule<Self>] = &[
        Rule::new("datetime", datetime),
        Rule::new("required", required::<Self>),
    ];

    pub fn from_config(config: &FieldConfig) -> FieldResult<Self> {
        Self::build("datetime", DATETIME_FORMAT, config)
    }

    pub fn date(config: &FieldConfig) -> FieldResult<Self> {
        Self::build("date", DATE_FORMAT, config)
    }

    fn build(tag: &'static str, default_format: &str, config: &FieldConfig) -> FieldResult<Self> {
        config.ensure_keys(tag, &["format"])?;
        let format = config
            .string(tag, "format")?
            .unwrap_or_else(|| default_format.to_string());

        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(FieldError::invalid_config(
                tag,
                format!("invalid format '{}'", format),
            ));
        }

        Ok(Self {
            state: FieldState::from_config(tag, config)?,
            format,
            tag,
        })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parses `text`, falling back to a date at midnight for date-only patterns.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, &self.format)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, &self.format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

fn datetime(field: &DateTimeField, value: &FieldValue) -> RuleResult {
    match value {
        FieldValue::Null | FieldValue::DateTime(_) => Ok(None),
        FieldValue::Text(text) => match field.parse(text.trim()) {
            Some(parsed) => Ok(Some(FieldValue::DateTime(parsed))),
            None => Err(field.state.failure("invalid_date", "Invalid Datetime")),
        },
        _ => Err(field.state.failure("invalid_date", "Invalid Datetime")),
    }
}

impl Field for DateTimeField {
    fn type_tag(&self) -> &'static str {
        self.tag
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

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_datetime_parses_text() {
        let mut field = DateTimeField::default();
        field.set_value("2016-03-01 12:30:00".into());
        assert_eq!(field.clean(), FieldValue::DateTime(at(2016, 3, 1, 12, 30, 0)));
        assert!(field.is_valid());
    }

    #[test]
    fn test_datetime_passthrough() {
        let mut field = DateTimeField::default();
        let now = at(2020, 1, 2, 3, 4, 5);
        field.set_value(now.into());
        assert_eq!(field.clean(), FieldValue::DateTime(now));
    }

    #[test]
    fn test_invalid_datetime() {
        let mut field = DateTimeField::default();
        field.set_value("yesterday".into());
        field.clean();
        assert_eq!(field.error(), Some("Invalid Datetime"));

        field.set_value(FieldValue::Int(12));
        field.clean();
        assert!(!field.is_valid());
    }

    #[test]
    fn test_invalid_date_message_override() {
        let config = FieldConfig::new().with("messages", json!({"invalid_date": "Use YYYY-MM-DD"}));
        let mut field = DateTimeField::date(&config).unwrap();
        field.set_value("01/02/2016".into());
        field.clean();
        assert_eq!(field.error(), Some("Use YYYY-MM-DD"));
    }

    #[test]
    fn test_date_is_midnight() {
        let mut field = DateTimeField::date(&FieldConfig::new()).unwrap();
        assert_eq!(field.type_tag(), "date");
        field.set_value("2016-03-01".into());
        assert_eq!(field.clean(), FieldValue::DateTime(at(2016, 3, 1, 0, 0, 0)));
    }

    #[test]
    fn test_custom_format() {
        let config = FieldConfig::new().with("format", "%d/%m/%Y %H:%M");
        let mut field = DateTimeField::from_config(&config).unwrap();
        field.set_value("01/03/2016 08:15".into());
        assert_eq!(field.clean(), FieldValue::DateTime(at(2016, 3, 1, 8, 15, 0)));
    }

    #[test]
    fn test_bad_format_rejected() {
        let config = FieldConfig::new().with("format", "%Y-%Q");
        assert!(DateTimeField::from_config(&config).is_err());
    }
}
