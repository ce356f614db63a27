//! Route definitions for CVE reference links.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::cve_links;
use crate::state::AppState;

/// CVE link routes mounted at `/cve-links`.
///
/// ```text
/// GET    /       -> list_cve_links
/// POST   /       -> create_cve_link (manager+)
/// DELETE /{id}   -> delete_cve_link (manager+)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cve_links::list_cve_links).post(cve_links::create_cve_link),
        )
        .route("/{id}", delete(cve_links::delete_cve_link))
}
