//! Error types for DynamoDB operations.

use aws_sdk_dynamodb::error::DisplayErrorContext;
use thiserror::Error;

/// Result type alias for dynamodb module.
pub type Result<T> = std::result::Result<T, DynamodbError>;

/// Errors that can occur during DynamoDB operations.
#[derive(Error, Debug)]
pub enum DynamodbError {
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Table '{table_name}' not found")]
    TableNotFound { table_name: String },

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Timeout waiting for table to become active")]
    TableActivationTimeout,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DynamodbError {
    fn from(err: serde_json::Error) -> Self {
        DynamodbError::Serialization(err.to_string())
    }
}

/// Wraps any AWS SDK or builder error, keeping its full source chain.
pub fn sdk_error(err: impl std::error::Error) -> DynamodbError {
    DynamodbError::AwsSdk(DisplayErrorContext(err).to_string())
}
