//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response bodies built from them.

/// Customer account model
pub mod account;
/// Authenticated customer model
pub mod customer;
/// Ledger entry model
pub mod transaction;
