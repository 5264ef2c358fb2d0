//! Transaction history filtering.
//!
//! Query strings arrive untyped. They are turned into a `TransactionFilter`
//! once, here, and every store renders that filter the same way:
//!
//! - `transaction_type`: "deposit" / "withdraw" in any case, anything else is ignored
//! - `start_day` + `end_day`: both must be `YYYY-MM-DD`; `end_day` is inclusive for the
//!   caller and becomes an exclusive bound one day later; an empty or inverted range is ignored
//! - `ordering`: "true" in any case selects newest-first
//! - `page`: 1-based, anything unparseable falls back to the first page

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Deserialize;

use crate::models::transaction::{Transaction, TransactionType};

/// Date format accepted for `start_day` and `end_day`.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Raw query parameters of `GET /transactions`.
///
/// All fields are kept as strings so a malformed value never rejects the request.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub transaction_type: Option<String>,
    pub start_day: Option<String>,
    pub end_day: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<String>,
}

/// Half-open interval `[start, end)` on `transaction_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Build the range from calendar days. Returns `None` when either day fails to
    /// parse or when the resulting range is empty.
    pub fn from_days(start_day: Option<&str>, end_day: Option<&str>) -> Option<Self> {
        let start = parse_day(start_day?)?;
        let end = parse_day(end_day?)?.checked_add_days(Days::new(1))?;

        if end <= start {
            return None;
        }

        Some(Self {
            start: start.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: end.and_time(chrono::NaiveTime::MIN).and_utc(),
        })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

fn parse_day(day: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(day, DAY_FORMAT).ok()
}

/// Typed filter over one account's transaction history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub date_range: Option<DateRange>,

    /// Newest first when set, insertion order otherwise.
    pub descending: bool,
}

impl TransactionFilter {
    pub fn from_query(query: &TransactionQuery) -> Self {
        Self {
            transaction_type: query
                .transaction_type
                .as_deref()
                .and_then(|value| value.parse().ok()),
            date_range: DateRange::from_days(query.start_day.as_deref(), query.end_day.as_deref()),
            descending: query
                .ordering
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case("true")),
        }
    }

    /// Whether a single record passes the type and date criteria.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.transaction_type
            .is_none_or(|kind| kind == transaction.transaction_type)
            && self
                .date_range
                .is_none_or(|range| range.contains(transaction.transaction_date))
    }
}

/// Which slice of the filtered history to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn from_query(query: &TransactionQuery, page_size: u32) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1);

        Self {
            page,
            page_size: page_size.max(1),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

/// One page of filtered history plus the total number of matches.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub count: i64,
    pub items: Vec<Transaction>,
}
