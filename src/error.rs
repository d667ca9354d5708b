//! Error types for Tasklet
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Tasklet
#[derive(Debug, Error)]
pub enum TaskletError {
    /// Caller supplied a value the boundary rejects (empty title, bad date)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Task or folder not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Tasklet operations
pub type Result<T> = std::result::Result<T, TaskletError>;
