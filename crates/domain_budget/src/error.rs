//! Budget domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur in the budget domain
#[derive(Debug, Error)]
pub enum BudgetError {
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

impl From<PortError> for BudgetError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => BudgetError::NotFound { entity_type, id },
            PortError::Validation { message } => BudgetError::Validation(message),
            PortError::Conflict { message } => BudgetError::Conflict(message),
            other => BudgetError::Store(other.to_string()),
        }
    }
}
