//! Field error types
//!
//! Two kinds of failure live here and they never mix:
//! - `ValidationFailure` is a routine outcome of a rule. It is recorded on the
//!   field and observed through `is_valid()`, never returned to the caller.
//! - `FieldError` is a configuration or programmer error (unknown type tag,
//!   bad keyword configuration) and is fatal to the call that raised it.

use std::fmt;

use thiserror::Error;

/// Signal returned by a rule to abort the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    message: String,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Configuration and registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// No constructor registered for the tag
    #[error("Unknown field type '{0}'")]
    UnknownFieldType(String),

    /// Keyword configuration rejected by the field constructor
    #[error("Invalid configuration for '{field_type}' field: {reason}")]
    InvalidConfig { field_type: String, reason: String },

    /// Attribute access on a name that is not a field
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// A writer panicked while holding the registry lock
    #[error("Field type registry lock poisoned")]
    RegistryPoisoned,
}

impl FieldError {
    pub fn invalid_config(field_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field_type: field_type.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownFieldType(_) => "FIELDBIND_UNKNOWN_FIELD_TYPE",
            Self::InvalidConfig { .. } => "FIELDBIND_INVALID_CONFIG",
            Self::UnknownField(_) => "FIELDBIND_UNKNOWN_FIELD",
            Self::RegistryPoisoned => "FIELDBIND_REGISTRY_POISONED",
        }
    }
}

/// Result type for field construction and registry operations
pub type FieldResult<T> = Result<T, FieldError>;
