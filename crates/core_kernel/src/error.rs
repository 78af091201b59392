//! Kernel error type
//!
//! Domain crates carry their own error enums; this type only covers
//! failures produced inside the kernel itself.

use thiserror::Error;

use crate::calendar::CalendarError;
use crate::money::MoneyError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}
