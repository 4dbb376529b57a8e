//! Keyword configuration for field constructors
//!
//! A field spec is a JSON object carrying a `type` tag plus type-specific
//! keyword configuration:
//!
//! ```json
//! { "type": "char", "min_length": 3, "max_length": 6, "blank": false }
//! ```
//!
//! Keys set to `null` are treated as absent. Unknown keys are rejected by the
//! constructor so that typos surface at construction time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{FieldError, FieldResult};
use super::value::FieldValue;

/// Keys every field constructor accepts.
pub const COMMON_KEYS: [&str; 3] = ["required", "default", "messages"];

/// Keyword configuration passed to a field constructor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldConfig(Map<String, Value>);

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the raw value for a key, treating `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rejects keys outside the common set and `extra`.
    pub fn ensure_keys(&self, field_type: &str, extra: &[&str]) -> FieldResult<()> {
        for key in self.0.keys() {
            let known = COMMON_KEYS.contains(&key.as_str()) || extra.contains(&key.as_str());
            if !known {
                return Err(FieldError::invalid_config(
                    field_type,
                    format!("unexpected keyword '{}'", key),
                ));
            }
        }
        Ok(())
    }

    pub fn bool_or(&self, field_type: &str, key: &str, default: bool) -> FieldResult<bool> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(type_error(field_type, key, "a boolean", other)),
        }
    }

    pub fn usize(&self, field_type: &str, key: &str) -> FieldResult<Option<usize>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| type_error(field_type, key, "a non-negative integer", v)),
        }
    }

    /// Reads a numeric bound, keeping integers as integers.
    pub fn number(&self, field_type: &str, key: &str) -> FieldResult<Option<FieldValue>> {
        match self.get(key) {
            None => Ok(None),
            Some(v @ Value::Number(_)) => Ok(Some(FieldValue::from_json(v))),
            Some(other) => Err(type_error(field_type, key, "a number", other)),
        }
    }

    pub fn string(&self, field_type: &str, key: &str) -> FieldResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(type_error(field_type, key, "a string", other)),
        }
    }

    /// Like [`FieldConfig::string`] but the key must be present.
    pub fn required_string(&self, field_type: &str, key: &str) -> FieldResult<String> {
        self.string(field_type, key)?
            .ok_or_else(|| FieldError::invalid_config(field_type, format!("missing '{}'", key)))
    }

    pub fn list(&self, field_type: &str, key: &str) -> FieldResult<Option<Vec<FieldValue>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items.iter().map(FieldValue::from_json).collect())),
            Some(other) => Err(type_error(field_type, key, "a list", other)),
        }
    }

    /// Reads a nested keyword configuration (e.g. list element kwargs).
    pub fn nested(&self, field_type: &str, key: &str) -> FieldResult<FieldConfig> {
        match self.get(key) {
            None => Ok(FieldConfig::new()),
            Some(Value::Object(obj)) => Ok(FieldConfig(obj.clone())),
            Some(other) => Err(type_error(field_type, key, "an object", other)),
        }
    }

    /// The configured default value, or null.
    pub fn default_value(&self) -> FieldValue {
        self.get("default").map(FieldValue::from_json).unwrap_or_default()
    }

    /// Per-rule message overrides.
    pub fn messages(&self, field_type: &str) -> FieldResult<BTreeMap<String, String>> {
        let obj = match self.get("messages") {
            None => return Ok(BTreeMap::new()),
            Some(Value::Object(obj)) => obj,
            Some(other) => return Err(type_error(field_type, "messages", "an object", other)),
        };

        obj.iter()
            .map(|(rule, message)| match message {
                Value::String(s) => Ok((rule.clone(), s.clone())),
                other => Err(type_error(field_type, &format!("messages.{}", rule), "a string", other)),
            })
            .collect()
    }
}

impl From<Map<String, Value>> for FieldConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn type_error(field_type: &str, key: &str, expected: &str, actual: &Value) -> FieldError {
    FieldError::invalid_config(
        field_type,
        format!("'{}' must be {}, got {}", key, expected, actual),
    )
}

/// A type tag plus its keyword configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(flatten)]
    pub config: FieldConfig,
}

impl FieldSpec {
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            config: FieldConfig::new(),
        }
    }

    /// Builder-style configuration
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_key_rejected() {
        let config = FieldConfig::new().with("min_lenght", 3);
        let err = config.ensure_keys("char", &["min_length"]).unwrap_err();
        assert!(err.to_string().contains("min_lenght"));
    }

    #[test]
    fn test_common_keys_accepted() {
        let config = FieldConfig::new()
            .with("required", true)
            .with("default", "x")
            .with("messages", json!({"required": "nope"}));
        assert!(config.ensure_keys("char", &[]).is_ok());
    }

    #[test]
    fn test_null_is_absent() {
        let config = FieldConfig::new().with("max_length", Value::Null);
        assert_eq!(config.usize("char", "max_length").unwrap(), None);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let config = FieldConfig::new().with("blank", "no");
        assert!(config.bool_or("char", "blank", true).is_err());

        let config = FieldConfig::new().with("max_length", -1);
        assert!(config.usize("char", "max_length").is_err());
    }

    #[test]
    fn test_number_keeps_integers() {
        let config = FieldConfig::new().with("min", 3).with("max", 4.5);
        assert_eq!(config.number("int", "min").unwrap(), Some(FieldValue::Int(3)));
        assert_eq!(config.number("int", "max").unwrap(), Some(FieldValue::Float(4.5)));
    }

    #[test]
    fn test_messages() {
        let config = FieldConfig::new().with("messages", json!({"blank": "Fill it in"}));
        let messages = config.messages("char").unwrap();
        assert_eq!(messages.get("blank").map(String::as_str), Some("Fill it in"));

        let config = FieldConfig::new().with("messages", json!({"blank": 3}));
        assert!(config.messages("char").is_err());
    }

    #[test]
    fn test_spec_deserializes_flattened() {
        let spec: FieldSpec = serde_json::from_value(json!({
            "type": "choice",
            "choices": ["big", "small"],
            "required": true
        }))
        .unwrap();

        assert_eq!(spec.type_tag, "choice");
        assert_eq!(
            spec.config.list("choice", "choices").unwrap(),
            Some(vec![FieldValue::from("big"), FieldValue::from("small")])
        );
        assert!(spec.config.bool_or("choice", "required", false).unwrap());
    }
}
