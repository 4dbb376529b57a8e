//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Document already exists: {collection}/{id}")]
    Duplicate { collection: String, id: String },

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: impl ToString) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(collection: &str, id: impl ToString) -> Self {
        Self::Duplicate {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "FIELDBIND_STORE_NOT_FOUND",
            StoreError::Duplicate { .. } => "FIELDBIND_STORE_DUPLICATE",
            StoreError::Backend(_) => "FIELDBIND_STORE_BACKEND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(StoreError::not_found("tapiocas", "x").code(), "FIELDBIND_STORE_NOT_FOUND");
        assert_eq!(StoreError::Backend("down".into()).code(), "FIELDBIND_STORE_BACKEND");
    }

    #[test]
    fn test_display() {
        let err = StoreError::duplicate("tapiocas", "abc");
        assert_eq!(err.to_string(), "Document already exists: tapiocas/abc");
    }
}
