//! Transaction service - deposits, withdrawals and history.
//!
//! This service handles:
//! - Amount validation
//! - Delegating the atomic balance update to the ledger store
//! - Filtered, paged history listing
//!
//! # Atomicity Guarantees
//!
//! The store applies each balance change and inserts its ledger row in one
//! unit, holding the account lock across the balance check. A rejected
//! request leaves no trace.

use rust_decimal::Decimal;

use crate::{
    error::AppError,
    models::account::{Account, LEDGER_VALUE_LIMIT, ledger_value_limit},
    services::transaction_filter::{PageRequest, TransactionFilter, TransactionPage},
    store::{Applied, LedgerStore},
};

/// Fractional digits the ledger stores (NUMERIC(20, 2)).
pub const AMOUNT_SCALE: u32 = 2;

/// Reject amounts that are not strictly positive, reach `LEDGER_VALUE_LIMIT`,
/// or carry more than `AMOUNT_SCALE` fractional digits.
pub fn validate_amount(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "Amount must be positive".to_string(),
        ));
    }

    if amount >= ledger_value_limit() {
        return Err(AppError::InvalidRequest(format!(
            "Amount must be less than {LEDGER_VALUE_LIMIT}"
        )));
    }

    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(AppError::InvalidRequest(format!(
            "Amount must have at most {AMOUNT_SCALE} decimal places"
        )));
    }

    Ok(())
}

/// Add money to an account.
///
/// # Process
///
/// 1. Validate amount
/// 2. Increase the balance and record a DEPOSIT in one atomic unit
///
/// # Errors
///
/// - `InvalidRequest`: Amount is zero, negative, too large or too precise
/// - `BalanceLimitExceeded`: The new balance would not fit the ledger
/// - `AccountNotFound`: Account vanished
/// - `Database`: Database error occurred
pub async fn deposit(
    store: &dyn LedgerStore,
    account: &Account,
    amount: Decimal,
    description: &str,
) -> Result<Applied, AppError> {
    validate_amount(amount)?;

    let applied = store.deposit(account.id, amount, description).await?;

    tracing::info!(
        account_number = %account.account_number,
        transaction_id = applied.transaction.id,
        amount = %amount,
        balance = %applied.balance,
        "Deposit applied"
    );

    Ok(applied)
}

/// Remove money from an account.
///
/// The balance check runs inside the store under the account lock, never
/// against the possibly stale `account.balance` snapshot.
///
/// # Errors
///
/// - `InvalidRequest`: Amount is zero, negative, too large or too precise
/// - `InsufficientBalance`: Amount exceeds the current balance
/// - `AccountNotFound`: Account vanished
/// - `Database`: Database error occurred
pub async fn withdraw(
    store: &dyn LedgerStore,
    account: &Account,
    amount: Decimal,
    description: &str,
) -> Result<Applied, AppError> {
    validate_amount(amount)?;

    let applied = match store.withdraw(account.id, amount, description).await {
        Ok(applied) => applied,
        Err(AppError::InsufficientBalance) => {
            tracing::warn!(
                account_number = %account.account_number,
                amount = %amount,
                "Withdrawal rejected: insufficient balance"
            );
            return Err(AppError::InsufficientBalance);
        }
        Err(err) => return Err(err),
    };

    tracing::info!(
        account_number = %account.account_number,
        transaction_id = applied.transaction.id,
        amount = %amount,
        balance = %applied.balance,
        "Withdrawal applied"
    );

    Ok(applied)
}

/// One page of the account's history matching `filter`.
pub async fn list_transactions(
    store: &dyn LedgerStore,
    account: &Account,
    filter: &TransactionFilter,
    page: PageRequest,
) -> Result<TransactionPage, AppError> {
    store.list_transactions(account.id, filter, page).await
}
