//! Router assembly and shared handler state.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware, store::LedgerStore};

/// State shared with every handler via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,

    /// Transactions per page on `GET /transactions`
    pub page_size: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>, page_size: u32) -> Self {
        Self { store, page_size }
    }
}

/// Build the full HTTP application.
///
/// Everything under `/api/v1` requires a bearer token; `/health` is public.
pub fn build_router(state: AppState) -> Router {
    let authenticated_routes = Router::new()
        // Account provisioning
        .route(
            "/account",
            post(handlers::accounts::create_account).get(handlers::accounts::get_account),
        )
        // Ledger
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions),
        )
        .route(
            "/transactions/deposits",
            post(handlers::transactions::create_deposit),
        )
        .route(
            "/transactions/withdraw",
            post(handlers::transactions::create_withdraw),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", authenticated_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
