//! Handlers for finding categories and their templates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use surveytrack_core::error::CoreError;
use surveytrack_core::findings::{validate_category_name, TemplateInput};
use surveytrack_core::ordering::{assign_order_indices, check_complete_ordering, move_item};
use surveytrack_core::types::DbId;
use surveytrack_db::models::finding::{
    CategoryInput, FindingCategory, FindingTemplate, ReorderCategories,
};
use surveytrack_db::repositories::{FindingCategoryRepo, FindingTemplateRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/finding-categories
pub async fn list_categories(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<FindingCategory>>>> {
    let categories = FindingCategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/finding-categories
///
/// New categories are appended after the current last one.
pub async fn create_category(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Json(input): Json<CategoryInput>,
) -> AppResult<(StatusCode, Json<DataResponse<FindingCategory>>)> {
    validate_category_name(&input.name)?;
    let category = FindingCategoryRepo::create(&state.pool, input.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/finding-categories/{id}
pub async fn rename_category(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<DataResponse<FindingCategory>>> {
    validate_category_name(&input.name)?;
    let category = FindingCategoryRepo::rename(&state.pool, id, input.name.trim())
        .await?
        .ok_or_else(|| not_found("finding_category", id))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/finding-categories/{id}
///
/// Templates in the category are removed with it.
pub async fn delete_category(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !FindingCategoryRepo::delete(&state.pool, id).await? {
        return Err(not_found("finding_category", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/finding-categories/order
///
/// Body is either `{"ids": [...]}` listing every category in the desired
/// order, or `{"from": 2, "to": 0}` for a single drag. Only rows whose
/// position changed are written.
pub async fn reorder_categories(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Json(input): Json<ReorderCategories>,
) -> AppResult<Json<DataResponse<Vec<FindingCategory>>>> {
    let current = FindingCategoryRepo::list(&state.pool).await?;
    let desired: Vec<(DbId, i32)> = match input {
        ReorderCategories::Ids { ids } => {
            let existing: Vec<DbId> = current.iter().map(|c| c.id).collect();
            check_complete_ordering(&existing, &ids)?;
            ids.iter()
                .filter_map(|id| current.iter().find(|c| c.id == *id))
                .map(|c| (c.id, c.order_index))
                .collect()
        }
        ReorderCategories::Move { from, to } => {
            let mut rows: Vec<(DbId, i32)> =
                current.iter().map(|c| (c.id, c.order_index)).collect();
            move_item(&mut rows, from, to)?;
            rows
        }
    };
    let changes = assign_order_indices(&desired);
    FindingCategoryRepo::apply_order(&state.pool, &changes).await?;
    tracing::debug!(changed = changes.len(), "Finding categories reordered");

    let categories = FindingCategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// GET /api/v1/finding-categories/{id}/templates
pub async fn list_templates(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(category_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FindingTemplate>>>> {
    FindingCategoryRepo::find_by_id(&state.pool, category_id)
        .await?
        .ok_or_else(|| not_found("finding_category", category_id))?;
    let templates = FindingTemplateRepo::list_for_category(&state.pool, category_id).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/finding-categories/{id}/templates
pub async fn create_template(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(category_id): Path<DbId>,
    Json(input): Json<TemplateInput>,
) -> AppResult<(StatusCode, Json<DataResponse<FindingTemplate>>)> {
    input.validate()?;
    FindingCategoryRepo::find_by_id(&state.pool, category_id)
        .await?
        .ok_or_else(|| not_found("finding_category", category_id))?;
    let template = FindingTemplateRepo::create(&state.pool, category_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// PUT /api/v1/finding-templates/{id}
pub async fn update_template(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<TemplateInput>,
) -> AppResult<Json<DataResponse<FindingTemplate>>> {
    input.validate()?;
    let template = FindingTemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("finding_template", id))?;
    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/finding-templates/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !FindingTemplateRepo::delete(&state.pool, id).await? {
        return Err(not_found("finding_template", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
