use std::sync::Arc;

use surveytrack_core::store::SurveyStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is an `Arc` or a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly by the reference-data
    /// handlers (clients, findings, CVE links, audit, users).
    pub pool: surveytrack_db::DbPool,
    /// Survey lifecycle collaborator. PostgreSQL in production; tests swap
    /// in the in-memory store.
    pub store: Arc<dyn SurveyStore>,
    pub config: Arc<ServerConfig>,
}
