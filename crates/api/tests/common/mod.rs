//! Shared helpers for API integration tests.
//!
//! Two app flavours are provided:
//! - [`build_test_app`] runs against a real database (`#[sqlx::test]`).
//! - [`memory_app`] swaps in the in-memory survey store and a lazy pool, so
//!   survey, dashboard and settings routes can be exercised without Postgres.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use surveytrack_api::auth::jwt::{generate_access_token, JwtConfig};
use surveytrack_api::config::ServerConfig;
use surveytrack_api::router::build_app_router;
use surveytrack_api::state::AppState;
use surveytrack_core::roles::Role;
use surveytrack_core::store::MemorySurveyStore;
use surveytrack_core::survey::{Client, Survey, UserProfile};
use surveytrack_core::types::DbId;
use surveytrack_db::PgSurveyStore;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 1,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            audience: None,
        },
    }
}

/// Signed bearer token for `user_id` under the test secret.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, 3600, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Database-backed app
// ---------------------------------------------------------------------------

/// Full router over a real database, using the production store.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        store: Arc::new(PgSurveyStore::new(pool.clone())),
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Insert a profile row and return its id.
pub async fn seed_db_profile(pool: &PgPool, role: Role) -> DbId {
    let id = Uuid::new_v4();
    surveytrack_db::repositories::ProfileRepo::insert(pool, id, &format!("{id}@example.com"), role)
        .await
        .unwrap();
    id
}

// ---------------------------------------------------------------------------
// In-memory app
// ---------------------------------------------------------------------------

/// A router backed by [`MemorySurveyStore`], plus a handle to seed it.
pub struct MemoryApp {
    pub store: Arc<MemorySurveyStore>,
    pub config: ServerConfig,
}

impl MemoryApp {
    pub async fn new() -> Self {
        Self {
            store: Arc::new(MemorySurveyStore::new()),
            config: test_config(),
        }
    }

    /// A fresh router over the shared store. Routers are consumed by
    /// `oneshot`, so build one per request.
    pub fn router(&self) -> Router {
        let pool = surveytrack_db::create_lazy_pool("postgres://localhost:1/surveytrack_test")
            .unwrap();
        let state = AppState {
            pool,
            store: self.store.clone(),
            config: Arc::new(self.config.clone()),
        };
        build_app_router(state, &self.config)
    }

    pub async fn user(&self, role: Role) -> DbId {
        let id = Uuid::new_v4();
        self.store
            .insert_profile(UserProfile {
                id,
                email: format!("{id}@example.com"),
                first_name: None,
                last_name: None,
                role,
                gender: None,
            })
            .await;
        id
    }

    pub async fn client(&self, name: &str) -> DbId {
        let id = Uuid::new_v4();
        self.store
            .insert_client(Client {
                id,
                name: name.to_string(),
                logo_ref: None,
                created_at: Utc::now(),
            })
            .await;
        id
    }

    /// Seed a survey last updated `days_ago` days ago.
    pub async fn survey(
        &self,
        client_id: DbId,
        owner: DbId,
        status: &str,
        days_ago: i64,
    ) -> DbId {
        let id = Uuid::new_v4();
        let updated_at = Utc::now() - Duration::days(days_ago) - Duration::hours(1);
        self.store
            .insert_survey(Survey {
                id,
                client_id,
                client_name: None,
                system_name: format!("System {id}"),
                system_description: None,
                survey_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                received_date: None,
                last_email_bounce_date: None,
                status: status.to_string(),
                is_archived: false,
                owner_user_id: owner,
                created_at: updated_at,
                updated_at,
                contacts: Vec::new(),
            })
            .await;
        id
    }
}

pub async fn memory_app() -> MemoryApp {
    MemoryApp::new().await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
