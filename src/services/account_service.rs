//! Account provisioning.
//!
//! A customer owns at most one account. Account numbers are random
//! twelve-digit strings; a collision with an existing number is retried.

use rand::Rng;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::account::{ACCOUNT_NUMBER_LEN, Account},
    store::LedgerStore,
};

/// How many fresh account numbers to try before giving up.
const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

/// Random account number of `ACCOUNT_NUMBER_LEN` digits without a leading zero.
pub fn generate_account_number() -> String {
    let low = 10u64.pow(ACCOUNT_NUMBER_LEN as u32 - 1);
    let high = 10u64.pow(ACCOUNT_NUMBER_LEN as u32);
    rand::rng().random_range(low..high).to_string()
}

/// Open the customer's account with a zero balance.
///
/// # Errors
///
/// - `AccountAlreadyExists`: the customer already has an account, including when a
///   concurrent request created it first
/// - `Database`: storage failure
/// - `Internal`: every generated account number was already taken
pub async fn create_account(
    store: &dyn LedgerStore,
    customer_id: Uuid,
) -> Result<Account, AppError> {
    for _ in 0..ACCOUNT_NUMBER_ATTEMPTS {
        if store.find_account_by_customer(customer_id).await?.is_some() {
            return Err(AppError::AccountAlreadyExists);
        }

        let account_number = generate_account_number();
        if let Some(account) = store.insert_account(customer_id, &account_number).await? {
            tracing::info!(
                customer_id = %customer_id,
                account_number = %account.account_number,
                "Account created"
            );
            return Ok(account);
        }
    }

    // The last miss may have been the customer's own concurrent insert
    if store.find_account_by_customer(customer_id).await?.is_some() {
        return Err(AppError::AccountAlreadyExists);
    }

    tracing::error!(customer_id = %customer_id, "Could not allocate a unique account number");
    Err(AppError::Internal(
        "no free account number after retries".to_string(),
    ))
}

/// The customer's account, if one was opened.
pub async fn get_account(
    store: &dyn LedgerStore,
    customer_id: Uuid,
) -> Result<Option<Account>, AppError> {
    store.find_account_by_customer(customer_id).await
}

/// The customer's account, or `AccountNotFound`.
pub async fn require_account(
    store: &dyn LedgerStore,
    customer_id: Uuid,
) -> Result<Account, AppError> {
    get_account(store, customer_id)
        .await?
        .ok_or(AppError::AccountNotFound)
}
