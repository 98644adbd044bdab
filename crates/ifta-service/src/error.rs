//! Error types for service operations

use ifta_domain::{RequestId, RequestStatus, ValidationError};
use thiserror::Error;

/// Boxed error from the underlying store
pub type StorageSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during request lifecycle operations
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Submitter input was missing or malformed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No request has the given tracking id
    #[error("Request not found: {0}")]
    NotFound(RequestId),

    /// The requested review cannot be applied
    #[error("Invalid transition: {0}")]
    InvalidTransition(TransitionError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[source] StorageSource),
}

/// Why a review was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The request already carries a terminal decision
    #[error("request is already {0}")]
    AlreadyDecided(RequestStatus),

    /// An answer decision without answer text
    #[error("answer text is required")]
    MissingAnswer,

    /// An answer decision without the answering mufti
    #[error("mufti name is required")]
    MissingMuftiName,
}

impl ServiceError {
    /// Wrap a store error
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ServiceError::Storage(Box::new(err))
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
