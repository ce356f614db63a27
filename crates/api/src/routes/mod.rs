pub mod admin;
pub mod clients;
pub mod cve_links;
pub mod dashboard;
pub mod findings;
pub mod health;
pub mod settings;
pub mod surveys;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /surveys                                  list, create
/// /surveys/{id}                             get, update field, delete
/// /surveys/{id}/archive                     archive (manager+)
/// /surveys/{id}/restore                     restore (manager+)
/// /surveys/{id}/history                     tracked-field history
/// /surveys/{id}/contacts                    list, replace
///
/// /dashboard                                aggregates over visible surveys
/// /dashboard/stuck                          stuck surveys, most stale first
/// /reminders                                surveys needing a nudge
///
/// /settings                                 get, update (admin)
/// /statuses                                 status catalog with colours
///
/// /clients                                  list, create
/// /clients/{id}                             get, update, delete
///
/// /finding-categories                       list, create
/// /finding-categories/order                 reorder (PUT)
/// /finding-categories/{id}                  rename, delete
/// /finding-categories/{id}/templates        list, create
/// /finding-templates/{id}                   update, delete
///
/// /cve-links                                list, create
/// /cve-links/{id}                           delete
///
/// /admin/audit-logs                         query audit trail (admin)
/// /admin/users                              list profiles (admin)
/// /admin/users/{id}/role                    change role (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Survey lifecycle.
        .nest("/surveys", surveys::router())
        // Aggregates and staleness.
        .nest("/dashboard", dashboard::router())
        .route("/reminders", get(handlers::dashboard::get_reminders))
        // Settings and the status catalog.
        .nest("/settings", settings::router())
        .route("/statuses", get(handlers::settings::list_statuses))
        // Reference data.
        .nest("/clients", clients::router())
        .nest("/finding-categories", findings::categories_router())
        .nest("/finding-templates", findings::templates_router())
        .nest("/cve-links", cve_links::router())
        // Administration.
        .nest("/admin", admin::router())
}
