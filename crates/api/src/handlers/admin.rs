//! Admin-only handlers: audit log and user roles.

use axum::extract::{Path, Query, State};
use axum::Json;
use surveytrack_core::audit::{action_types, AuditLogQuery};
use surveytrack_core::error::CoreError;
use surveytrack_core::survey::UserProfile;
use surveytrack_core::types::DbId;
use surveytrack_db::models::audit::AuditLog;
use surveytrack_db::models::profile::UpdateRole;
use surveytrack_db::repositories::{AuditLogRepo, ProfileRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/audit-logs
///
/// Newest first. `limit` is clamped to 1..=500 (default 100).
pub async fn list_audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AuditLogQuery>,
) -> AppResult<Json<DataResponse<Vec<AuditLog>>>> {
    if let Some(action) = params.action_type.as_deref() {
        if !action_types::ALL.iter().any(|a| *a == action) {
            return Err(AppError::BadRequest(format!(
                "Invalid action_type '{action}'. Must be one of: {}",
                action_types::ALL.join(", ")
            )));
        }
    }
    let logs = AuditLogRepo::query(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserProfile>>>> {
    let users = ProfileRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|row| row.into_profile())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: users }))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Admins cannot change their own role.
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRole>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot change their own role".into(),
        )));
    }

    let updated = ProfileRepo::update_role(&state.pool, id, input.role, admin.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "profile",
            id,
        }))?
        .into_profile()?;
    tracing::info!(user_id = %id, admin_id = %admin.user_id, role = updated.role.as_str(), "User role set");

    Ok(Json(DataResponse { data: updated }))
}
