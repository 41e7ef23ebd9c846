//! Error types for queue views.

use crate::types::ColumnId;
use thiserror::Error;

/// Main error type for queue view operations.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate column id: {0}")]
    DuplicateColumn(ColumnId),

    #[error("No filter entry at index: {0}")]
    FilterIndex(usize),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(u64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Session store is locked by another process")]
    Locked,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<serde_json::Error> for QueueError {
    fn from(e: serde_json::Error) -> Self {
        QueueError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for QueueError {
    fn from(e: csv::Error) -> Self {
        QueueError::Serialization(e.to_string())
    }
}

/// Result type for queue view operations.
pub type Result<T> = std::result::Result<T, QueueError>;
