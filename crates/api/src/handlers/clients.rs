//! Handlers for the `/clients` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use surveytrack_core::error::CoreError;
use surveytrack_core::types::DbId;
use surveytrack_core::validation::require_non_empty;
use surveytrack_db::models::client::{ClientInput, ClientRow};
use surveytrack_db::repositories::ClientRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

fn client_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "client",
        id,
    })
}

/// GET /api/v1/clients
pub async fn list_clients(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<ClientRow>>>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/v1/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClientRow>>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| client_not_found(id))?;
    Ok(Json(DataResponse { data: client }))
}

/// POST /api/v1/clients
///
/// Any authenticated user may add a client while creating a survey.
/// Duplicate names are rejected with 409 by the unique constraint.
pub async fn create_client(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<ClientInput>,
) -> AppResult<(StatusCode, Json<DataResponse<ClientRow>>)> {
    require_non_empty("name", &input.name)?;
    let client = ClientRepo::create(&state.pool, &input, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// PUT /api/v1/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<ClientInput>,
) -> AppResult<Json<DataResponse<ClientRow>>> {
    require_non_empty("name", &input.name)?;
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| client_not_found(id))?;
    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/clients/{id}
///
/// Deletes the client's surveys along with it.
pub async fn delete_client(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let client = ClientRepo::delete(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| client_not_found(id))?;
    tracing::info!(client_id = %id, user_id = %user.user_id, name = %client.name, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
