//! Liveness endpoint, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    /// The shared pool answered `SELECT 1`.
    pub db_healthy: bool,
    /// The survey store could read the settings singleton.
    pub store_healthy: bool,
}

/// GET /health
///
/// Always 200 so load balancers can tell a degraded instance from a dead one.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = surveytrack_db::health_check(&state.pool).await.is_ok();
    let store_healthy = match state.store.fetch_system_settings().await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Survey store health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy && store_healthy {
            "ok"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        store_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
