//! Route definitions for administration.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET /audit-logs         -> list_audit_logs
/// GET /users              -> list_users
/// PUT /users/{id}/role    -> update_user_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/audit-logs", get(admin::list_audit_logs))
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::update_user_role))
}
