//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: Database entity representing a ledger entry
//! - `TransactionType`: DEPOSIT or WITHDRAW
//! - `AmountRequest`: Request body for deposits and withdrawals
//! - `TransactionReceipt` / `TransactionResponse`: Bodies returned to clients

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of ledger entry.
///
/// Stored as the PostgreSQL enum `transaction_type` and rendered in
/// upper case on the wire (`"DEPOSIT"`, `"WITHDRAW"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "transaction_type", rename_all = "UPPERCASE")]
pub enum TransactionType {
    Deposit,
    Withdraw,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdraw => "WITHDRAW",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known transaction type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction type: {0}")]
pub struct UnknownTransactionType(pub String);

/// Case-insensitive: "deposit", "DEPOSIT" and "Deposit" all parse.
impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("deposit") {
            Ok(TransactionType::Deposit)
        } else if s.eq_ignore_ascii_case("withdraw") {
            Ok(TransactionType::Withdraw)
        } else {
            Err(UnknownTransactionType(s.to_string()))
        }
    }
}

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Rows are insert-only:
/// - `id` comes from a sequence and grows with every insert
/// - `transaction_date` is assigned by the server and strictly increases per account
/// - `transaction_amount` is always positive (CHECK constraint)
///
/// The owning `account_id` is only used to scope queries, so it is not loaded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,

    pub transaction_type: TransactionType,

    pub transaction_amount: Decimal,

    /// Free text supplied by the customer, empty when omitted
    pub description: String,

    pub transaction_date: DateTime<Utc>,
}

/// Request body for both deposits and withdrawals.
///
/// # JSON Example
///
/// ```json
/// {
///   "transaction_amount": 400,
///   "description": "test_deposit"
/// }
/// ```
///
/// `transaction_amount` may be sent as a JSON number or a string.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub transaction_amount: Decimal,

    #[serde(default)]
    pub description: String,
}

/// Response returned after a deposit or withdrawal.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 42,
///   "account": "408213379102",
///   "transaction_type": "WITHDRAW",
///   "transaction_amount": "400",
///   "description": "test_withdraw",
///   "transaction_date": "2025-12-21T16:00:00Z",
///   "account_balance": "9600"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransactionReceipt {
    pub id: i64,

    /// Account number the entry was booked on
    pub account: String,
    pub transaction_type: TransactionType,
    pub transaction_amount: Decimal,
    pub description: String,
    pub transaction_date: DateTime<Utc>,

    /// Balance right after this entry was applied
    pub account_balance: Decimal,
}

impl TransactionReceipt {
    pub fn new(transaction: Transaction, account_number: &str, account_balance: Decimal) -> Self {
        Self {
            id: transaction.id,
            account: account_number.to_string(),
            transaction_type: transaction.transaction_type,
            transaction_amount: transaction.transaction_amount,
            description: transaction.description,
            transaction_date: transaction.transaction_date,
            account_balance,
        }
    }
}

/// One entry of the transaction history listing.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub account: String,
    pub transaction_type: TransactionType,
    pub transaction_amount: Decimal,
    pub description: String,
    pub transaction_date: DateTime<Utc>,
}

impl TransactionResponse {
    pub fn new(transaction: Transaction, account_number: &str) -> Self {
        Self {
            id: transaction.id,
            account: account_number.to_string(),
            transaction_type: transaction.transaction_type,
            transaction_amount: transaction.transaction_amount,
            description: transaction.description,
            transaction_date: transaction.transaction_date,
        }
    }
}

/// Paginated transaction history.
///
/// `count` is the number of matching entries across all pages.
#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub count: i64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<TransactionResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_parses_case_insensitively() {
        assert_eq!("deposit".parse(), Ok(TransactionType::Deposit));
        assert_eq!("WITHDRAW".parse(), Ok(TransactionType::Withdraw));
        assert_eq!("Withdraw".parse(), Ok(TransactionType::Withdraw));
        assert!("transfer".parse::<TransactionType>().is_err());
        assert!("".parse::<TransactionType>().is_err());
    }

    #[test]
    fn amount_request_accepts_numbers_and_strings() {
        let from_number: AmountRequest =
            serde_json::from_str(r#"{"transaction_amount": 400, "description": "rent"}"#).unwrap();
        assert_eq!(from_number.transaction_amount, Decimal::from(400));
        assert_eq!(from_number.description, "rent");

        let from_string: AmountRequest =
            serde_json::from_str(r#"{"transaction_amount": "12.50"}"#).unwrap();
        assert_eq!(from_string.transaction_amount, Decimal::new(1250, 2));
        assert_eq!(from_string.description, "");
    }

    #[test]
    fn transaction_type_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&TransactionType::Withdraw).unwrap(),
            r#""WITHDRAW""#
        );
    }
}
