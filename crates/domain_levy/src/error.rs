//! Levy domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur in the levy billing domain
#[derive(Debug, Error)]
pub enum LevyError {
    /// Input failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Operation conflicts with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Monetary arithmetic error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Store-level failure
    #[error("Store error: {0}")]
    Store(String),
}

impl LevyError {
    /// Creates a not-found error
    pub fn not_found(entity_type: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }
}

impl From<PortError> for LevyError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => LevyError::NotFound { entity_type, id },
            PortError::Validation { message } => LevyError::Validation(message),
            PortError::Conflict { message } => LevyError::Conflict(message),
            other => LevyError::Store(other.to_string()),
        }
    }
}
