//! Handlers for the `/surveys` resource.
//!
//! Every read goes through the caller's visibility scope. A survey outside
//! the scope is reported as not found so its existence does not leak.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use surveytrack_core::error::CoreError;
use surveytrack_core::filter::{SurveyFilter, FILTER_ALL};
use surveytrack_core::history::SurveyFieldUpdate;
use surveytrack_core::roles::{can_archive_surveys, can_edit_survey, VisibilityScope};
use surveytrack_core::survey::{Contact, ContactInput, HistoryEntry, NewSurvey, Survey};
use surveytrack_core::types::DbId;
use surveytrack_core::validation::parse_date;
use surveytrack_db::models::contact::ContactRow;
use surveytrack_db::repositories::ContactRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /surveys`.
///
/// Dates are `YYYY-MM-DD`. `archived` is `false` (default), `true` or `all`.
#[derive(Debug, Default, Deserialize)]
pub struct SurveyListParams {
    pub search: Option<String>,
    pub client_id: Option<DbId>,
    pub client: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub archived: Option<String>,
}

impl SurveyListParams {
    fn into_filter(self) -> AppResult<SurveyFilter> {
        let date_from = self
            .date_from
            .as_deref()
            .map(|d| parse_date("date_from", d))
            .transpose()?;
        let date_to = self
            .date_to
            .as_deref()
            .map(|d| parse_date("date_to", d))
            .transpose()?;
        let archived = match self.archived.as_deref().map(str::trim) {
            None | Some("") | Some("false") => Some(false),
            Some("true") => Some(true),
            Some(v) if v.eq_ignore_ascii_case(FILTER_ALL) => None,
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "Invalid archived value '{other}'. Must be one of: true, false, all"
                )))
            }
        };

        Ok(SurveyFilter {
            search: self.search,
            client_id: self.client_id,
            client_name: self.client,
            status: self.status,
            date_from,
            date_to,
            archived,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a survey the caller is allowed to see.
pub(crate) async fn load_visible_survey(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Survey> {
    let survey = state.store.fetch_survey(id).await?;
    let scope = VisibilityScope::for_user(&user.requesting_user());
    if !scope.permits_owner(survey.owner_user_id) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "survey",
            id,
        }));
    }
    Ok(survey)
}

/// Fetch a survey the caller may modify: their own, or any for managers
/// and admins. Anything else reads as not found, like [`load_visible_survey`].
async fn load_editable_survey(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Survey> {
    let survey = state.store.fetch_survey(id).await?;
    if !can_edit_survey(&user.requesting_user(), survey.owner_user_id) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "survey",
            id,
        }));
    }
    Ok(survey)
}

/// Archive or restore. The store audits the toggle with the update and
/// skips both when the flag is already set.
async fn set_archived(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    archived: bool,
) -> AppResult<Survey> {
    load_editable_survey(state, user, id).await?;
    let survey = state
        .store
        .update_survey_field(id, SurveyFieldUpdate::IsArchived(archived), user.user_id)
        .await?;
    tracing::info!(survey_id = %id, user_id = %user.user_id, archived, "Survey archive flag set");
    Ok(survey)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/surveys
///
/// List surveys visible to the caller, filtered by the query parameters.
pub async fn list_surveys(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<SurveyListParams>,
) -> AppResult<Json<DataResponse<Vec<Survey>>>> {
    let filter = params.into_filter()?;
    let scope = VisibilityScope::for_user(&user.requesting_user());
    let surveys = state.store.fetch_surveys(scope).await?;
    Ok(Json(DataResponse {
        data: filter.apply_owned(surveys),
    }))
}

/// POST /api/v1/surveys
///
/// Create a survey owned by the caller. Status defaults to `received`.
pub async fn create_survey(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<NewSurvey>,
) -> AppResult<(StatusCode, Json<DataResponse<Survey>>)> {
    let survey = state.store.create_survey(input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: survey })))
}

/// GET /api/v1/surveys/{id}
pub async fn get_survey(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Survey>>> {
    let survey = load_visible_survey(&state, &user, id).await?;
    Ok(Json(DataResponse { data: survey }))
}

/// PATCH /api/v1/surveys/{id}
///
/// Update a single field, e.g. `{"field": "status", "value": "in_writing"}`.
/// Tracked fields get a history entry. Toggling `is_archived` needs the
/// archive permission.
pub async fn update_survey_field(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(update): Json<SurveyFieldUpdate>,
) -> AppResult<Json<DataResponse<Survey>>> {
    if let SurveyFieldUpdate::IsArchived(archived) = update {
        if !can_archive_surveys(user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Manager or Admin role required to archive surveys".into(),
            )));
        }
        let survey = set_archived(&state, &user, id, archived).await?;
        return Ok(Json(DataResponse { data: survey }));
    }

    load_editable_survey(&state, &user, id).await?;
    let survey = state
        .store
        .update_survey_field(id, update, user.user_id)
        .await?;
    Ok(Json(DataResponse { data: survey }))
}

/// POST /api/v1/surveys/{id}/archive
pub async fn archive_survey(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Survey>>> {
    let survey = set_archived(&state, &user, id, true).await?;
    Ok(Json(DataResponse { data: survey }))
}

/// POST /api/v1/surveys/{id}/restore
pub async fn restore_survey(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Survey>>> {
    let survey = set_archived(&state, &user, id, false).await?;
    Ok(Json(DataResponse { data: survey }))
}

/// DELETE /api/v1/surveys/{id}
///
/// Permanently delete an archived survey. Returns 409 if it is still active.
pub async fn delete_survey(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_visible_survey(&state, &user, id).await?;
    state.store.delete_archived_survey(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/surveys/{id}/history
///
/// Tracked-field changes, newest first.
pub async fn get_history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<HistoryEntry>>>> {
    load_visible_survey(&state, &user, id).await?;
    let history = state.store.fetch_history(id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/surveys/{id}/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Contact>>>> {
    let survey = load_visible_survey(&state, &user, id).await?;
    Ok(Json(DataResponse {
        data: survey.contacts,
    }))
}

/// PUT /api/v1/surveys/{id}/contacts
///
/// Replace the whole contact list in one transaction.
pub async fn replace_contacts(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(contacts): Json<Vec<ContactInput>>,
) -> AppResult<Json<DataResponse<Vec<ContactRow>>>> {
    load_editable_survey(&state, &user, id).await?;
    ContactInput::validate_all(&contacts)?;
    let rows = ContactRepo::replace_for_survey(&state.pool, id, &contacts).await?;
    tracing::info!(survey_id = %id, count = rows.len(), "Survey contacts replaced");
    Ok(Json(DataResponse { data: rows }))
}
