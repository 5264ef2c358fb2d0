//! Account data models and API response types.
//!
//! This module defines:
//! - `Account`: Database entity representing a customer's account
//! - `AccountResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Number of decimal digits in a generated account number.
pub const ACCOUNT_NUMBER_LEN: usize = 12;

/// Exclusive upper bound of a `NUMERIC(20, 2)` value: 18 integer digits.
///
/// Neither a single amount nor a balance may reach it.
pub const LEDGER_VALUE_LIMIT: i64 = 1_000_000_000_000_000_000;

/// `LEDGER_VALUE_LIMIT` as a `Decimal`.
pub fn ledger_value_limit() -> Decimal {
    Decimal::from(LEDGER_VALUE_LIMIT)
}

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table. Each account:
/// - Belongs to exactly one customer (unique `customer_id`)
/// - Has a unique, human-facing `account_number`
/// - Holds a balance as `NUMERIC(20, 2)`, mapped to `Decimal`
///
/// `updated_at` is maintained by the store on every balance change but is not
/// part of this struct.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique identifier for this account
    pub id: Uuid,

    /// Owning customer. At most one account exists per customer.
    pub customer_id: Uuid,

    /// Twelve decimal digits, unique across all accounts
    pub account_number: String,

    /// Current balance
    ///
    /// Must be >= 0 (enforced by database CHECK constraint).
    /// Only deposits and withdrawals change it.
    pub balance: Decimal,

    /// Timestamp when account was created
    pub created_at: DateTime<Utc>,
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_number": "408213379102",
///   "customer_name": "test_user",
///   "balance": "9600.00",
///   "created_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub account_number: String,

    /// Username of the owning customer
    pub customer_name: String,

    pub balance: Decimal,

    pub created_at: DateTime<Utc>,
}

impl AccountResponse {
    /// Build the client view of an account. Internal ids are not exposed.
    pub fn new(account: Account, customer_name: impl Into<String>) -> Self {
        Self {
            account_number: account.account_number,
            customer_name: customer_name.into(),
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}
