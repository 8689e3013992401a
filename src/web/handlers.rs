//! Request handlers for the sales query API.
//!
//! Multi-valued keys arrive comma-joined on the wire (`?regions=North,South`);
//! the core additionally accepts native lists when params are built
//! programmatically. All handlers are total: malformed filter, sort, or page
//! input degrades per the core's rules instead of failing the request.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use salesdash_core::{filter_options, process_query, FilterOptions, QueryParams, QueryResult};

use super::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub records_loaded: usize,
}

/// GET /api/sales: filtered, sorted, paginated sales records.
pub async fn get_sales(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<QueryResult> {
    Json(process_query(&state.records, &params))
}

/// GET /api/sales/filter-options: filter values still applicable under the
/// currently active filters.
pub async fn get_filter_options(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<FilterOptions> {
    Json(filter_options(&state.records, &params))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records_loaded: state.records.len(),
    })
}
