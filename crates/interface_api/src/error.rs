//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_budget::BudgetError;
use domain_ledger::LedgerError;
use domain_levy::LevyError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<LevyError> for ApiError {
    fn from(err: LevyError) -> Self {
        match err {
            LevyError::Validation(msg) => ApiError::Validation(msg),
            LevyError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{} {}", entity_type, id))
            }
            LevyError::Conflict(msg) => ApiError::Conflict(msg),
            LevyError::Money(e) => ApiError::Validation(e.to_string()),
            LevyError::Store(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(msg) => ApiError::Validation(msg),
            LedgerError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{} {}", entity_type, id))
            }
            LedgerError::Conflict(msg) => ApiError::Conflict(msg),
            LedgerError::Unbalanced { debits, credits } => ApiError::Validation(format!(
                "Transaction does not balance: debits={}, credits={}",
                debits, credits
            )),
            LedgerError::Money(e) => ApiError::Validation(e.to_string()),
            LedgerError::Store(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::Validation(msg) => ApiError::Validation(msg),
            BudgetError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{} {}", entity_type, id))
            }
            BudgetError::Conflict(msg) => ApiError::Conflict(msg),
            BudgetError::Money(e) => ApiError::Validation(e.to_string()),
            BudgetError::Store(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}
