//! # Model Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::fields::FieldError;
use crate::store::StoreError;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Model errors
///
/// Validation failures are not errors; they live in the model's error report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// `remove()` on a model that was never saved or loaded
    #[error("Model has no identity")]
    MissingIdentity,
}

impl ModelError {
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::Field(e) => e.code(),
            ModelError::Store(e) => e.code(),
            ModelError::MissingIdentity => "FIELDBIND_MISSING_IDENTITY",
        }
    }
}

/// Errors loading a model spec file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model spec '{}': field '{field}': {source}", path.display())]
    Invalid {
        path: PathBuf,
        field: String,
        #[source]
        source: FieldError,
    },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "FIELDBIND_CONFIG_IO",
            ConfigError::Parse { .. } => "FIELDBIND_CONFIG_PARSE",
            ConfigError::Invalid { .. } => "FIELDBIND_CONFIG_INVALID",
        }
    }
}
