//! Model spec files
//!
//! ```json
//! { "collection": "tapiocas",
//!   "fields": { "size": { "type": "choice", "choices": ["big"], "required": true } } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::fieldset::FieldSpecs;
use super::{Model, ModelResult};
use crate::fields::FieldRegistry;
use crate::store::Store;

/// A collection name plus its field specs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub collection: String,
    #[serde(default)]
    pub fields: FieldSpecs,
}

impl ModelSpec {
    /// Read, parse and check a spec file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Builds every field once so bad tags or keywords surface here.
    pub fn check(&self, registry: &FieldRegistry, path: &Path) -> Result<(), ConfigError> {
        for (name, spec) in &self.fields {
            registry
                .make_field_from_spec(spec)
                .map_err(|source| ConfigError::Invalid {
                    path: path.to_path_buf(),
                    field: name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Build a model for this spec over `store`.
    pub fn build(&self, store: Arc<dyn Store>) -> ModelResult<Model> {
        Model::new(store, self.collection.as_str(), self.fields.clone())
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let spec: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        spec.check(crate::fields::registry(), path)?;
        Ok(spec)
    }
}

impl FromStr for ModelSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &PathBuf::from("<inline>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TAPIOCA: &str = r#"{
        "collection": "tapiocas",
        "fields": {
            "size": {"type": "choice", "choices": ["big", "small"], "required": true},
            "toppings": {"type": "list", "field": "char", "field_kwargs": {"max_length": 20}}
        }
    }"#;

    #[test]
    fn test_from_str() {
        let spec: ModelSpec = TAPIOCA.parse().unwrap();
        assert_eq!(spec.collection, "tapiocas");
        assert_eq!(spec.fields["size"].type_tag, "choice");
        assert_eq!(spec.fields.len(), 2);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TAPIOCA.as_bytes()).unwrap();

        let spec = ModelSpec::load(file.path()).unwrap();
        assert_eq!(spec.collection, "tapiocas");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelSpec::load(dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.code(), "FIELDBIND_CONFIG_IO");
    }

    #[test]
    fn test_bad_json() {
        let err = "{ nope".parse::<ModelSpec>().unwrap_err();
        assert_eq!(err.code(), "FIELDBIND_CONFIG_PARSE");
    }

    #[test]
    fn test_unknown_type_reported_at_load() {
        let err = r#"{"collection": "c", "fields": {"x": {"type": "sized"}}}"#
            .parse::<ModelSpec>()
            .unwrap_err();
        assert_eq!(err.code(), "FIELDBIND_CONFIG_INVALID");
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_bad_keyword_reported_at_load() {
        let err = r#"{"collection": "c", "fields": {"x": {"type": "char", "max_lenght": 3}}}"#
            .parse::<ModelSpec>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
