//! Customer model for authentication.
//!
//! Customers are registered by the external identity service. This service only
//! reads them to resolve a bearer token to its owner. Tokens are stored as SHA-256 hashes.

use uuid::Uuid;

/// The owner of a bearer token, as resolved by the auth middleware.
///
/// # Database Table
///
/// Read from the `customers` table, which also holds:
/// - `token_hash`: SHA-256 hash of the customer's bearer token
/// - `is_active`: Whether the customer may authenticate
/// - `created_at`: When the customer was registered
///
/// Only the columns needed to build an `AuthContext` are selected; the
/// lookup query itself filters on `token_hash` and `is_active`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,

    /// Login name, shown as `customer_name` on the account
    pub username: String,
}
