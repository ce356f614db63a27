//! Handlers for the dashboard, stuck list and reminders.
//!
//! All views aggregate over the caller's visible surveys with the current
//! system settings threaded in explicitly.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use surveytrack_core::aggregate::{
    aggregate, monthly_completions_from_history, AggregateOptions, AggregateResult,
};
use surveytrack_core::roles::VisibilityScope;
use surveytrack_core::staleness::{reminder_items, stuck_items, StaleSurveyItem};
use surveytrack_core::survey::Survey;
use surveytrack_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// How the monthly trend attributes completed surveys.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMode {
    /// Count a completion in the month the survey was created.
    #[default]
    Creation,
    /// Count a completion in the month it was recorded in history.
    Completion,
}

/// Query parameters for `GET /dashboard`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    #[serde(default)]
    pub include_zero_statuses: bool,
    #[serde(default)]
    pub trend: TrendMode,
}

async fn visible_active_surveys(state: &AppState, user: &AuthUser) -> AppResult<Vec<Survey>> {
    let scope = VisibilityScope::for_user(&user.requesting_user());
    let mut surveys = state.store.fetch_surveys(scope).await?;
    surveys.retain(|s| !s.is_archived);
    Ok(surveys)
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<DataResponse<AggregateResult>>> {
    let surveys = visible_active_surveys(&state, &user).await?;
    let settings = state.store.fetch_system_settings().await?;
    let options = AggregateOptions {
        include_zero_statuses: params.include_zero_statuses,
    };
    let mut result = aggregate(&surveys, &settings, options, Utc::now());

    if let TrendMode::Completion = params.trend {
        let completed: Vec<DbId> = surveys
            .iter()
            .filter(|s| s.is_completed())
            .map(|s| s.id)
            .collect();
        let history = state.store.fetch_status_history(&completed).await?;
        result.monthly_trend = monthly_completions_from_history(&surveys, &history);
    }

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/dashboard/stuck
///
/// Active, non-completed surveys idle for longer than the stuck threshold.
pub async fn get_stuck(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<StaleSurveyItem>>>> {
    let surveys = visible_active_surveys(&state, &user).await?;
    let settings = state.store.fetch_system_settings().await?;
    let items = stuck_items(&surveys, settings.stuck_threshold_days, Utc::now());
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/reminders
///
/// Like the stuck list, but skips surveys waiting on a scheduled meeting.
pub async fn get_reminders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<StaleSurveyItem>>>> {
    let surveys = visible_active_surveys(&state, &user).await?;
    let settings = state.store.fetch_system_settings().await?;
    let items = reminder_items(&surveys, settings.stuck_threshold_days, Utc::now());
    Ok(Json(DataResponse { data: items }))
}
