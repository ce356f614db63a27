//! Handlers for system settings and the status catalog.

use axum::extract::State;
use axum::Json;
use surveytrack_core::error::CoreError;
use surveytrack_core::roles::can_manage_settings;
use surveytrack_core::settings::{SystemSettings, UpdateSystemSettings};
use surveytrack_core::status::{catalog, CatalogEntry};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn get_settings(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<SystemSettings>>> {
    let settings = state.store.fetch_system_settings().await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
///
/// Partial update; omitted keys keep their current value. Admin only.
pub async fn update_settings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<UpdateSystemSettings>,
) -> AppResult<Json<DataResponse<SystemSettings>>> {
    if !can_manage_settings(user.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin role required to change system settings".into(),
        )));
    }
    let current = state.store.fetch_system_settings().await?;
    let next = input.apply(&current)?;
    let saved = state
        .store
        .update_system_settings(next, user.user_id)
        .await?;
    Ok(Json(DataResponse { data: saved }))
}

/// GET /api/v1/statuses
///
/// The ordered status catalog with effective colours.
pub async fn list_statuses(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<CatalogEntry>>>> {
    let settings = state.store.fetch_system_settings().await?;
    Ok(Json(DataResponse {
        data: catalog(&settings.status_colors),
    }))
}
