use thiserror::Error;

use crate::keys::KeyError;

/// Errors that can occur during storage operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Nothing matched. Expected in normal operation, for example when the
    /// schedule has been drained.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    /// A lookup that must be unique matched several records.
    #[error("expected one {entity_type} for {id} but found {count}")]
    MultipleResults {
        entity_type: &'static str,
        id: String,
        count: usize,
    },
    /// A write precondition did not hold: the item already exists, is gone,
    /// or was changed concurrently.
    #[error("Conditional check failed")]
    ConditionalCheckFailed,
    #[error("Malformed key: {0}")]
    MalformedKey(#[from] KeyError),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_conditional_check_failed(&self) -> bool {
        matches!(self, StoreError::ConditionalCheckFailed)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = StoreError::not_found("item", "LPA#a/DONOR#b");
        assert_eq!(error.to_string(), "item not found: LPA#a/DONOR#b");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_multiple_results_display() {
        let error = StoreError::MultipleResults {
            entity_type: "lpa owner",
            id: "M-1".to_string(),
            count: 2,
        };
        assert_eq!(
            error.to_string(),
            "expected one lpa owner for M-1 but found 2"
        );
    }

    #[test]
    fn test_conditional_check_failed_display() {
        let error = StoreError::ConditionalCheckFailed;
        assert_eq!(error.to_string(), "Conditional check failed");
        assert!(error.is_conditional_check_failed());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_malformed_key_from_key_error() {
        let error: StoreError = KeyError::UnknownPrefix("X#1".to_string()).into();
        assert_eq!(error.to_string(), "Malformed key: unknown key prefix: X#1");
    }

    #[test]
    fn test_query_failed_display() {
        let error = StoreError::QueryFailed("Throughput exceeded, please retry".to_string());
        assert_eq!(
            error.to_string(),
            "Query failed: Throughput exceeded, please retry"
        );
    }

    #[test]
    fn test_serialization_from_serde_error() {
        let err = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        let error: StoreError = err.into();
        assert!(matches!(error, StoreError::Serialization(_)));
    }
}
