//! Route definitions for the findings library.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::findings;
use crate::state::AppState;

/// Category routes mounted at `/finding-categories`.
///
/// Writes require `manager` or `admin` (enforced by handler extractors).
///
/// ```text
/// GET    /                  -> list_categories
/// POST   /                  -> create_category
/// PUT    /order             -> reorder_categories
/// PUT    /{id}              -> rename_category
/// DELETE /{id}              -> delete_category
/// GET    /{id}/templates    -> list_templates
/// POST   /{id}/templates    -> create_template
/// ```
pub fn categories_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(findings::list_categories).post(findings::create_category),
        )
        .route("/order", put(findings::reorder_categories))
        .route(
            "/{id}",
            put(findings::rename_category).delete(findings::delete_category),
        )
        .route(
            "/{id}/templates",
            get(findings::list_templates).post(findings::create_template),
        )
}

/// Template routes mounted at `/finding-templates`.
///
/// ```text
/// PUT    /{id}   -> update_template
/// DELETE /{id}   -> delete_template
/// ```
pub fn templates_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(findings::update_template).delete(findings::delete_template),
    )
}
