//! Bearer token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the token from the Authorization header
//! 2. Hash it and resolve the owning customer
//! 3. Inject authentication context into the request
//! 4. Reject unauthorized requests with HTTP 401
//!
//! Tokens are issued by the external identity service; only their hashes live here.

use crate::{error::AppError, routes::AppState};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; handlers extract it with
/// `Extension<AuthContext>` and pass it on explicitly.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Customer the token belongs to
    ///
    /// Every account and transaction query is scoped by this id.
    pub customer_id: Uuid,

    /// Customer's username, echoed back as `customer_name`
    pub username: String,
}

/// SHA-256 of a bearer token, hex encoded (64 characters).
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Token of an `Authorization` header value using the Bearer scheme.
///
/// The scheme name is case-insensitive; an empty token is rejected.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Bearer token authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Hash the `<token>` using SHA-256
/// 3. Look up an active customer with that hash
/// 4. If found: inject `AuthContext` into request, call next handler
/// 5. If not found: return 401 Unauthorized error
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = bearer_token(auth_header).ok_or(AppError::Unauthorized)?;

    let customer = state
        .store
        .find_customer_by_token_hash(&hash_token(token))
        .await?
        .ok_or_else(|| {
            tracing::debug!("Rejected unknown bearer token");
            AppError::Unauthorized
        })?;

    request.extensions_mut().insert(AuthContext {
        customer_id: customer.id,
        username: customer.username,
    });

    Ok(next.run(request).await)
}
