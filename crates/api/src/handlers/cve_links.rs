//! Handlers for the CVE reference library.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use surveytrack_core::cve::NewCveLink;
use surveytrack_core::error::CoreError;
use surveytrack_core::types::DbId;
use surveytrack_db::models::cve_link::CveLink;
use surveytrack_db::repositories::CveLinkRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/cve-links
pub async fn list_cve_links(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<CveLink>>>> {
    let links = CveLinkRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: links }))
}

/// POST /api/v1/cve-links
///
/// The id is normalized to upper case; a missing URL defaults to the NVD
/// detail page.
pub async fn create_cve_link(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Json(input): Json<NewCveLink>,
) -> AppResult<(StatusCode, Json<DataResponse<CveLink>>)> {
    let link = input.validate()?;
    let created = CveLinkRepo::create(&state.pool, &link).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// DELETE /api/v1/cve-links/{id}
pub async fn delete_cve_link(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CveLinkRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "cve_link",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
