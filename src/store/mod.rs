//! Ledger persistence.
//!
//! `LedgerStore` is the only way the rest of the service touches customers,
//! accounts and transactions. Implementations guarantee that a balance change
//! and the transaction row recording it are committed together, and that
//! concurrent mutations of one account are applied one after the other.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{account::Account, customer::Customer, transaction::Transaction},
    services::transaction_filter::{PageRequest, TransactionFilter, TransactionPage},
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// A transaction row together with the balance it produced.
#[derive(Debug, Clone)]
pub struct Applied {
    pub transaction: Transaction,
    pub balance: Decimal,
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Active customer owning the token with this SHA-256 hex digest.
    async fn find_customer_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Customer>, AppError>;

    async fn find_account_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<Account>, AppError>;

    /// Insert a zero-balance account.
    ///
    /// Returns `Ok(None)` without writing anything when the customer already has an
    /// account or the account number is taken.
    async fn insert_account(
        &self,
        customer_id: Uuid,
        account_number: &str,
    ) -> Result<Option<Account>, AppError>;

    /// Add `amount` to the balance and record a DEPOSIT, atomically.
    async fn deposit(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<Applied, AppError>;

    /// Subtract `amount` and record a WITHDRAW, atomically.
    ///
    /// The balance check happens under the same lock as the update; fails with
    /// `InsufficientBalance` and writes nothing when `amount` exceeds the balance.
    async fn withdraw(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<Applied, AppError>;

    async fn list_transactions(
        &self,
        account_id: Uuid,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, AppError>;

    /// Cheap round trip to the backing store.
    async fn ping(&self) -> Result<(), AppError>;
}
