//! Account HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /api/v1/account - Open the caller's account
//! - GET /api/v1/account - Get the caller's account

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::account::AccountResponse,
    routes::AppState,
    services::account_service,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

/// Open an account for the authenticated customer.
///
/// # Endpoint
///
/// `POST /api/v1/account`
///
/// # Request Body
///
/// None. The owner is taken from the bearer token.
///
/// # Response
///
/// - **Success (201 Created)**: Returns the new account with a zero balance
/// - **Error (400)**: The customer already has an account
/// - **Error (401)**: Missing or invalid token
///
/// ```json
/// {
///   "account_number": "408213379102",
///   "customer_name": "test_user",
///   "balance": "0",
///   "created_at": "2025-12-20T10:00:00Z"
/// }
/// ```
pub async fn create_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let account = account_service::create_account(state.store.as_ref(), auth.customer_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse::new(account, auth.username)),
    ))
}

/// Get the authenticated customer's account.
///
/// # Response
///
/// - **Success (200 OK)**: Returns account details including the current balance
/// - **Error (404)**: No account has been opened yet
/// - **Error (401)**: Missing or invalid token
pub async fn get_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = account_service::require_account(state.store.as_ref(), auth.customer_id).await?;

    Ok(Json(AccountResponse::new(account, auth.username)))
}
