use thiserror::Error;

/// Failure reported by an outbound collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Rejected: {0}")]
    Rejected(String),
}
