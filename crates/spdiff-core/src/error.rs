//! Error types for spdiff

use thiserror::Error;

/// Core error type for spdiff operations
#[derive(Error, Debug)]
pub enum SpdiffError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for spdiff operations
pub type Result<T> = std::result::Result<T, SpdiffError>;
