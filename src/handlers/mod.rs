//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, query string, auth context)
//! 2. Calls into the services
//! 3. Returns HTTP response (JSON, status code)

/// Account provisioning endpoints
pub mod accounts;
/// Service health endpoint
pub mod health;
/// Deposit, withdrawal and history endpoints
pub mod transactions;
