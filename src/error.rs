//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error code.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Missing or unknown bearer token
/// - **Resource Errors**: Caller has no account yet
/// - **Business Logic Errors**: Insufficient balance, balance limit, duplicate account
/// - **Validation Errors**: Invalid amount or request body
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// Returns HTTP 500. Details are logged, never sent to the client.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unexpected server-side failure that is not a database error.
    ///
    /// Returns HTTP 500. The String is logged, never sent to the client.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Bearer token is missing, malformed, or does not belong to an active customer.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Authentication credentials were not provided or are invalid")]
    Unauthorized,

    /// The authenticated customer has not opened an account yet.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Account not found")]
    AccountNotFound,

    /// The customer already owns an account.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Account already exist.")]
    AccountAlreadyExists,

    /// Withdrawal amount exceeds the current balance.
    ///
    /// Returns HTTP 400 Bad Request. No state is changed.
    #[error("Insufficient balance")]
    InsufficientBalance,

    /// Deposit would push the balance past what the ledger can store.
    ///
    /// Returns HTTP 400 Bad Request. No state is changed.
    #[error("Balance would exceed the maximum the account can hold")]
    BalanceLimitExceeded,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("{0}")]
    InvalidRequest(String),
}

impl AppError {
    /// HTTP status and stable machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::AccountNotFound => (StatusCode::NOT_FOUND, "account_not_found"),
            AppError::AccountAlreadyExists => {
                (StatusCode::BAD_REQUEST, "account_already_exists")
            }
            AppError::InsufficientBalance => (StatusCode::BAD_REQUEST, "insufficient_balance"),
            AppError::BalanceLimitExceeded => (StatusCode::BAD_REQUEST, "balance_limit_exceeded"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Database(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            AppError::Database(ref err) => {
                tracing::error!("Database error: {:?}", err);
                "An internal error occurred".to_string()
            }
            AppError::Internal(ref detail) => {
                tracing::error!("Internal error: {}", detail);
                "An internal error occurred".to_string()
            }
            ref other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rule_violations_are_bad_requests() {
        for err in [
            AppError::InsufficientBalance,
            AppError::BalanceLimitExceeded,
            AppError::AccountAlreadyExists,
            AppError::InvalidRequest("Amount must be positive".into()),
        ] {
            assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn database_errors_hide_details() {
        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
