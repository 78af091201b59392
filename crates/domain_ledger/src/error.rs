//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Operation conflicts with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transaction lines do not balance
    #[error("Unbalanced transaction: debits={debits}, credits={credits}")]
    Unbalanced { debits: Decimal, credits: Decimal },

    /// Monetary arithmetic error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Store-level failure
    #[error("Store error: {0}")]
    Store(String),
}

impl From<PortError> for LedgerError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => LedgerError::NotFound { entity_type, id },
            PortError::Validation { message } => LedgerError::Validation(message),
            PortError::Conflict { message } => LedgerError::Conflict(message),
            other => LedgerError::Store(other.to_string()),
        }
    }
}
