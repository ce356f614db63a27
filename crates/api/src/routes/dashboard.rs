//! Route definitions for dashboard aggregates.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard routes mounted at `/dashboard`.
///
/// ```text
/// GET /        -> get_dashboard
/// GET /stuck   -> get_stuck
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::get_dashboard))
        .route("/stuck", get(dashboard::get_stuck))
}
