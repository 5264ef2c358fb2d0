//! In-process ledger store backing the test suite.
//!
//! All state sits behind a single async mutex, so mutations are serialized the
//! same way the row lock serializes them in PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::auth::hash_token,
    models::{
        account::{Account, ledger_value_limit},
        customer::Customer,
        transaction::{Transaction, TransactionType},
    },
    services::transaction_filter::{PageRequest, TransactionFilter, TransactionPage},
};

use super::{Applied, LedgerStore};

#[derive(Debug, Default)]
struct State {
    /// Active customers keyed by token hash
    customers: HashMap<String, Customer>,
    accounts: HashMap<Uuid, Account>,
    /// Ledger rows with their owning account, in insertion order
    transactions: Vec<(Uuid, Transaction)>,
    last_date: Option<DateTime<Utc>>,
}

impl State {
    fn next_date(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let date = match self.last_date {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_date = Some(date);
        date
    }

    fn apply(
        &mut self,
        account_id: Uuid,
        transaction_type: TransactionType,
        amount: Decimal,
        description: &str,
    ) -> Result<Applied, AppError> {
        let balance = {
            let account = self
                .accounts
                .get_mut(&account_id)
                .ok_or(AppError::AccountNotFound)?;

            let balance = match transaction_type {
                TransactionType::Deposit => account
                    .balance
                    .checked_add(amount)
                    .filter(|balance| *balance < ledger_value_limit())
                    .ok_or(AppError::BalanceLimitExceeded)?,
                TransactionType::Withdraw if amount > account.balance => {
                    return Err(AppError::InsufficientBalance);
                }
                TransactionType::Withdraw => account.balance - amount,
            };
            account.balance = balance;
            balance
        };

        let transaction = Transaction {
            id: self.transactions.len() as i64 + 1,
            transaction_type,
            transaction_amount: amount,
            description: description.to_string(),
            transaction_date: self.next_date(),
        };
        self.transactions.push((account_id, transaction.clone()));

        Ok(Applied {
            transaction,
            balance,
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<State>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active customer authenticating with `token`.
    pub async fn add_customer(&self, username: &str, token: &str) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            username: username.to_string(),
        };
        self.state
            .lock()
            .await
            .customers
            .insert(hash_token(token), customer.clone());
        customer
    }

    /// Every ledger row, in insertion order.
    pub async fn all_transactions(&self) -> Vec<Transaction> {
        self.state
            .lock()
            .await
            .transactions
            .iter()
            .map(|(_, transaction)| transaction.clone())
            .collect()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn find_customer_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Customer>, AppError> {
        let state = self.state.lock().await;
        Ok(state.customers.get(token_hash).cloned())
    }

    async fn find_account_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<Account>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.customer_id == customer_id)
            .cloned())
    }

    async fn insert_account(
        &self,
        customer_id: Uuid,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        let mut state = self.state.lock().await;

        let conflict = state
            .accounts
            .values()
            .any(|a| a.customer_id == customer_id || a.account_number == account_number);
        if conflict {
            return Ok(None);
        }

        let account = Account {
            id: Uuid::new_v4(),
            customer_id,
            account_number: account_number.to_string(),
            balance: Decimal::ZERO,
            created_at: Utc::now(),
        };
        state.accounts.insert(account.id, account.clone());

        Ok(Some(account))
    }

    async fn deposit(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<Applied, AppError> {
        self.state
            .lock()
            .await
            .apply(account_id, TransactionType::Deposit, amount, description)
    }

    async fn withdraw(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<Applied, AppError> {
        self.state
            .lock()
            .await
            .apply(account_id, TransactionType::Withdraw, amount, description)
    }

    async fn list_transactions(
        &self,
        account_id: Uuid,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, AppError> {
        let state = self.state.lock().await;

        let mut matching: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|(owner, t)| *owner == account_id && filter.matches(t))
            .map(|(_, t)| t.clone())
            .collect();

        if filter.descending {
            matching.sort_by(|a, b| {
                b.transaction_date
                    .cmp(&a.transaction_date)
                    .then(b.id.cmp(&a.id))
            });
        }

        let count = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(TransactionPage { count, items })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
