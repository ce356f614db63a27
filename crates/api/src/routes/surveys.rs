//! Route definitions for the survey lifecycle.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::surveys;
use crate::state::AppState;

/// Survey routes mounted at `/surveys`.
///
/// ```text
/// GET    /                 -> list_surveys
/// POST   /                 -> create_survey
/// GET    /{id}             -> get_survey
/// PATCH  /{id}             -> update_survey_field
/// DELETE /{id}             -> delete_survey (archived only, manager+)
/// POST   /{id}/archive     -> archive_survey (manager+)
/// POST   /{id}/restore     -> restore_survey (manager+)
/// GET    /{id}/history     -> get_history
/// GET    /{id}/contacts    -> list_contacts
/// PUT    /{id}/contacts    -> replace_contacts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(surveys::list_surveys).post(surveys::create_survey))
        .route(
            "/{id}",
            get(surveys::get_survey)
                .patch(surveys::update_survey_field)
                .delete(surveys::delete_survey),
        )
        .route("/{id}/archive", post(surveys::archive_survey))
        .route("/{id}/restore", post(surveys::restore_survey))
        .route("/{id}/history", get(surveys::get_history))
        .route(
            "/{id}/contacts",
            get(surveys::list_contacts).put(surveys::replace_contacts),
        )
}
