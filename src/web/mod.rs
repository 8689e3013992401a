pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use salesdash_core::SalesRecord;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state: the record set loaded once at startup.
///
/// The records are behind an `Arc` and never mutated, so concurrent request
/// handlers only ever read.
#[derive(Debug, Clone)]
pub struct AppState {
    pub records: Arc<Vec<SalesRecord>>,
}

impl AppState {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        AppState {
            records: Arc::new(records),
        }
    }
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sales", get(handlers::get_sales))
        .route("/api/sales/filter-options", get(handlers::get_filter_options))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
