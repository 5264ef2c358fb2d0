//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - GET /api/v1/transactions - Filtered, paginated history
//! - POST /api/v1/transactions/deposits - Add money to the caller's account
//! - POST /api/v1/transactions/withdraw - Remove money from the caller's account

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::transaction::{
        AmountRequest, TransactionListResponse, TransactionReceipt, TransactionResponse,
    },
    routes::AppState,
    services::{
        account_service,
        transaction_filter::{PageRequest, TransactionFilter, TransactionQuery},
        transaction_service,
    },
};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::JsonRejection},
};

/// Unwrap a JSON body, turning any rejection into a 400 `invalid_request`.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

/// List the caller's transactions.
///
/// # Query Parameters
///
/// - `transaction_type`: `deposit` or `withdraw`, any case; other values are ignored
/// - `start_day`, `end_day`: `YYYY-MM-DD`, both required, `end_day` inclusive
/// - `ordering`: `true` for newest first
/// - `page`: 1-based page number
///
/// # Response (200)
///
/// ```json
/// {
///   "count": 30,
///   "page": 1,
///   "page_size": 10,
///   "results": [ { "id": 1, "transaction_type": "DEPOSIT", ... } ]
/// }
/// ```
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let account = account_service::require_account(state.store.as_ref(), auth.customer_id).await?;

    let filter = TransactionFilter::from_query(&query);
    let page = PageRequest::from_query(&query, state.page_size);

    let found =
        transaction_service::list_transactions(state.store.as_ref(), &account, &filter, page)
            .await?;

    Ok(Json(TransactionListResponse {
        count: found.count,
        page: page.page,
        page_size: page.page_size,
        results: found
            .items
            .into_iter()
            .map(|t| TransactionResponse::new(t, &account.account_number))
            .collect(),
    }))
}

/// Deposit into the caller's account.
///
/// # Request Body
///
/// ```json
/// {
///   "transaction_amount": 400,
///   "description": "test_deposit"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Returns the receipt with the new balance
/// - **Error (400)**: Amount is not positive or the body is malformed
/// - **Error (404)**: The caller has no account
pub async fn create_deposit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<TransactionReceipt>, AppError> {
    let request = json_body(payload)?;
    let account = account_service::require_account(state.store.as_ref(), auth.customer_id).await?;

    let applied = transaction_service::deposit(
        state.store.as_ref(),
        &account,
        request.transaction_amount,
        &request.description,
    )
    .await?;

    Ok(Json(TransactionReceipt::new(
        applied.transaction,
        &account.account_number,
        applied.balance,
    )))
}

/// Withdraw from the caller's account.
///
/// # Validation
///
/// - Amount must be positive
/// - Account must hold at least the amount
///
/// # Response
///
/// - **Success (200 OK)**: Returns the receipt with the new balance
/// - **Error (400)**: Invalid amount, malformed body, or insufficient balance
/// - **Error (404)**: The caller has no account
pub async fn create_withdraw(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<TransactionReceipt>, AppError> {
    let request = json_body(payload)?;
    let account = account_service::require_account(state.store.as_ref(), auth.customer_id).await?;

    let applied = transaction_service::withdraw(
        state.store.as_ref(),
        &account,
        request.transaction_amount,
        &request.description,
    )
    .await?;

    Ok(Json(TransactionReceipt::new(
        applied.transaction,
        &account.account_number,
        applied.balance,
    )))
}
