//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They validate input and drive the ledger store.

pub mod account_service;
pub mod transaction_filter;
pub mod transaction_service;
