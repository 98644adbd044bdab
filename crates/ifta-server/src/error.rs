//! Error types for the server and operator commands.

use crate::config::ConfigError;
use ifta_service::ServiceError;
use ifta_store::StoreError;
use thiserror::Error;

/// Server error
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Opening or closing the store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A lifecycle operation failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Server binding or output error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid operator input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
