//! PostgreSQL ledger store.
//!
//! # Atomicity Guarantees
//!
//! Every deposit and withdrawal runs inside one database transaction:
//! lock the account row, check, update the balance, insert the ledger row, commit.
//! Dropping the transaction on any error rolls all of it back.
//!
//! # Isolation
//!
//! PostgreSQL's default READ COMMITTED is enough because the account row is
//! locked with `SELECT … FOR UPDATE` before the balance is read. A second
//! request for the same account waits for the first to commit and then sees
//! its balance.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{Account, ledger_value_limit},
        customer::Customer,
        transaction::{Transaction, TransactionType},
    },
    services::transaction_filter::{PageRequest, TransactionFilter, TransactionPage},
};

use super::{Applied, LedgerStore};

const ACCOUNT_COLUMNS: &str = "id, customer_id, account_number, balance, created_at";

const TRANSACTION_COLUMNS: &str =
    "id, transaction_type, transaction_amount, description, transaction_date";

#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: DbPool,
}

impl PgLedgerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Lock the account row for the rest of the transaction and read its balance.
async fn lock_balance(
    conn: &mut PgConnection,
    account_id: Uuid,
) -> Result<Option<Decimal>, sqlx::Error> {
    sqlx::query_scalar("SELECT balance FROM accounts WHERE id = $1 FOR UPDATE")
        .bind(account_id)
        .fetch_optional(conn)
        .await
}

/// Apply a signed balance change to a locked account row.
async fn update_balance(
    conn: &mut PgConnection,
    account_id: Uuid,
    delta: Decimal,
) -> Result<Decimal, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        UPDATE accounts
        SET balance = balance + $1,
            updated_at = NOW()
        WHERE id = $2
        RETURNING balance
        "#,
    )
    .bind(delta)
    .bind(account_id)
    .fetch_one(conn)
    .await
}

/// Insert one ledger row on an open transaction.
///
/// `transaction_date` is the later of the wall clock and one microsecond past the
/// account's newest entry, so dates strictly increase per account even if the
/// clock steps back. The caller must hold the account row lock.
async fn record_transaction(
    conn: &mut PgConnection,
    account_id: Uuid,
    transaction_type: TransactionType,
    amount: Decimal,
    description: &str,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        r#"
        INSERT INTO transactions (
            account_id,
            transaction_type,
            transaction_amount,
            description,
            transaction_date
        )
        VALUES (
            $1, $2, $3, $4,
            GREATEST(
                clock_timestamp(),
                (SELECT MAX(transaction_date) + INTERVAL '1 microsecond'
                 FROM transactions WHERE account_id = $1)
            )
        )
        RETURNING {TRANSACTION_COLUMNS}
        "#
    ))
    .bind(account_id)
    .bind(transaction_type)
    .bind(amount)
    .bind(description)
    .fetch_one(conn)
    .await
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, account_id: Uuid, filter: &TransactionFilter) {
    builder.push(" WHERE account_id = ").push_bind(account_id);

    if let Some(kind) = filter.transaction_type {
        builder.push(" AND transaction_type = ").push_bind(kind);
    }

    if let Some(range) = filter.date_range {
        builder
            .push(" AND transaction_date >= ")
            .push_bind(range.start)
            .push(" AND transaction_date < ")
            .push_bind(range.end);
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn find_customer_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, username
             FROM customers
             WHERE token_hash = $1 AND is_active = true",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn find_account_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert_account(
        &self,
        customer_id: Uuid,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        // Both customer_id and account_number are UNIQUE; either conflict yields no row
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (customer_id, account_number, balance)
            VALUES ($1, $2, 0)
            ON CONFLICT DO NOTHING
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn deposit(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<Applied, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(current) = lock_balance(&mut tx, account_id).await? else {
            tx.rollback().await?;
            return Err(AppError::AccountNotFound);
        };

        // NUMERIC(20, 2) would overflow
        if current
            .checked_add(amount)
            .is_none_or(|balance| balance >= ledger_value_limit())
        {
            tx.rollback().await?;
            return Err(AppError::BalanceLimitExceeded);
        }

        let balance = update_balance(&mut tx, account_id, amount).await?;

        let transaction = record_transaction(
            &mut tx,
            account_id,
            TransactionType::Deposit,
            amount,
            description,
        )
        .await?;

        tx.commit().await?;

        Ok(Applied {
            transaction,
            balance,
        })
    }

    async fn withdraw(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<Applied, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(current) = lock_balance(&mut tx, account_id).await? else {
            tx.rollback().await?;
            return Err(AppError::AccountNotFound);
        };

        if amount > current {
            tx.rollback().await?;
            return Err(AppError::InsufficientBalance);
        }

        let balance = update_balance(&mut tx, account_id, -amount).await?;

        let transaction = record_transaction(
            &mut tx,
            account_id,
            TransactionType::Withdraw,
            amount,
            description,
        )
        .await?;

        tx.commit().await?;

        Ok(Applied {
            transaction,
            balance,
        })
    }

    async fn list_transactions(
        &self,
        account_id: Uuid,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, AppError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM transactions");
        push_filter(&mut count_query, account_id, filter);
        let count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut list_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {TRANSACTION_COLUMNS} FROM transactions"));
        push_filter(&mut list_query, account_id, filter);
        list_query.push(if filter.descending {
            " ORDER BY transaction_date DESC, id DESC"
        } else {
            " ORDER BY transaction_date ASC, id ASC"
        });
        list_query
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = list_query
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await?;

        Ok(TransactionPage { count, items })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
