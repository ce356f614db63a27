//! HTTP-level tests for the survey lifecycle, dashboard and settings routes.
//!
//! These run against the in-memory survey store, so no database is needed.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration, Utc};
use common::{
    body_json, delete, get, get_auth, memory_app, patch_json, post_empty, post_json, put_json,
    token_for,
};
use serde_json::json;
use surveytrack_core::audit::action_types;
use surveytrack_core::roles::Role;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = memory_app().await;
    let response = get(app.router(), "/api/v1/surveys").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_without_profile_is_forbidden() {
    let app = memory_app().await;
    let token = token_for(Uuid::new_v4());
    let response = get_auth(app.router(), "/api/v1/surveys", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = memory_app().await;
    let response = get_auth(app.router(), "/api/v1/surveys", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Listing and visibility
// ---------------------------------------------------------------------------

#[tokio::test]
async fn surveyor_sees_only_own_surveys() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let a = app.user(Role::Surveyor).await;
    let b = app.user(Role::Surveyor).await;
    let manager = app.user(Role::Manager).await;
    for owner in [a, a, a, b, b] {
        app.survey(client, owner, "received", 1).await;
    }

    let json = body_json(get_auth(app.router(), "/api/v1/surveys", &token_for(a)).await).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items
        .iter()
        .all(|s| s["owner_user_id"] == json!(a.to_string())));
    assert_eq!(items[0]["client_name"], "Acme");

    let json =
        body_json(get_auth(app.router(), "/api/v1/surveys", &token_for(manager)).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn survey_outside_scope_is_not_found() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let a = app.user(Role::Surveyor).await;
    let b = app.user(Role::Surveyor).await;
    let id = app.survey(client, b, "received", 1).await;

    let response = get_auth(app.router(), &format!("/api/v1/surveys/{id}"), &token_for(a)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = patch_json(
        app.router(),
        &format!("/api/v1/surveys/{id}"),
        &token_for(a),
        json!({ "field": "status", "value": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let manager = app.user(Role::Manager).await;
    let response = patch_json(
        app.router(),
        &format!("/api/v1/surveys/{id}"),
        &token_for(manager),
        json!({ "field": "status", "value": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "completed");
}

#[tokio::test]
async fn list_filters_by_status_and_archived() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let manager = app.user(Role::Manager).await;
    let token = token_for(manager);
    app.survey(client, manager, "received", 1).await;
    app.survey(client, manager, "completed", 1).await;
    let archived = app.survey(client, manager, "completed", 1).await;

    let response =
        post_empty(app.router(), &format!("/api/v1/surveys/{archived}/archive"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(
        get_auth(app.router(), "/api/v1/surveys?status=completed", &token).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(
        get_auth(app.router(), "/api/v1/surveys?status=completed&archived=all", &token).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json =
        body_json(get_auth(app.router(), "/api/v1/surveys?archived=true", &token).await).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!(archived.to_string()));
}

#[tokio::test]
async fn invalid_filter_values_are_rejected() {
    let app = memory_app().await;
    let user = app.user(Role::Manager).await;
    let token = token_for(user);

    let response = get_auth(app.router(), "/api/v1/surveys?archived=maybe", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app.router(), "/api/v1/surveys?date_from=15-01-2024", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "date_from");
}

// ---------------------------------------------------------------------------
// Creation and field updates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_survey_defaults_to_received() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let user = app.user(Role::Surveyor).await;

    let response = post_json(
        app.router(),
        "/api/v1/surveys",
        &token_for(user),
        json!({
            "client_id": client,
            "system_name": "  Payroll  ",
            "survey_date": "2024-03-01",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "received");
    assert_eq!(json["data"]["system_name"], "Payroll");
    assert_eq!(json["data"]["owner_user_id"], json!(user.to_string()));
    assert_eq!(json["data"]["is_archived"], false);
}

#[tokio::test]
async fn create_survey_for_unknown_client_is_not_found() {
    let app = memory_app().await;
    let user = app.user(Role::Surveyor).await;

    let response = post_json(
        app.router(),
        "/api/v1/surveys",
        &token_for(user),
        json!({
            "client_id": Uuid::new_v4(),
            "system_name": "Payroll",
            "survey_date": "2024-03-01",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_change_is_recorded_in_history() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let user = app.user(Role::Surveyor).await;
    let token = token_for(user);
    let id = app.survey(client, user, "received", 3).await;

    let response = patch_json(
        app.router(),
        &format!("/api/v1/surveys/{id}"),
        &token,
        json!({ "field": "status", "value": "in_writing" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_writing");

    let json = body_json(
        get_auth(app.router(), &format!("/api/v1/surveys/{id}/history"), &token).await,
    )
    .await;
    let history = json["data"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["field_name"], "status");
    assert_eq!(history[0]["old_value"], "received");
    assert_eq!(history[0]["new_value"], "in_writing");
    assert_eq!(history[0]["user_id"], json!(user.to_string()));
}

#[tokio::test]
async fn unknown_status_value_is_rejected() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let user = app.user(Role::Surveyor).await;
    let id = app.survey(client, user, "received", 1).await;

    let response = patch_json(
        app.router(),
        &format!("/api/v1/surveys/{id}"),
        &token_for(user),
        json!({ "field": "status", "value": "on_hold" }),
    )
    .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn blank_system_name_is_a_validation_error() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let user = app.user(Role::Surveyor).await;
    let id = app.survey(client, user, "received", 1).await;

    let response = patch_json(
        app.router(),
        &format!("/api/v1/surveys/{id}"),
        &token_for(user),
        json!({ "field": "system_name", "value": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "system_name");
}

// ---------------------------------------------------------------------------
// Archive, restore, delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn surveyor_cannot_archive() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let user = app.user(Role::Surveyor).await;
    let id = app.survey(client, user, "completed", 1).await;
    let token = token_for(user);

    let response =
        post_empty(app.router(), &format!("/api/v1/surveys/{id}/archive"), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json(
        app.router(),
        &format!("/api/v1/surveys/{id}"),
        &token,
        json!({ "field": "is_archived", "value": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_requires_archived_survey() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let manager = app.user(Role::Manager).await;
    let token = token_for(manager);
    let id = app.survey(client, manager, "completed", 1).await;
    let uri = format!("/api/v1/surveys/{id}");

    let response = delete(app.router(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_empty(app.router(), &format!("{uri}/archive"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_archived"], true);

    let response = delete(app.router(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.router(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let actions: Vec<&str> = app
        .store
        .audit_events()
        .await
        .iter()
        .map(|e| e.action_type)
        .collect();
    assert_eq!(
        actions,
        vec![action_types::SURVEY_ARCHIVE, action_types::SURVEY_DELETE]
    );
}

#[tokio::test]
async fn archiving_an_archived_survey_is_not_audited_again() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let manager = app.user(Role::Manager).await;
    let token = token_for(manager);
    let id = app.survey(client, manager, "completed", 1).await;
    let uri = format!("/api/v1/surveys/{id}/archive");

    for _ in 0..2 {
        let response = post_empty(app.router(), &uri, &token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = patch_json(
        app.router(),
        &format!("/api/v1/surveys/{id}"),
        &token,
        json!({ "field": "is_archived", "value": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let archives = app
        .store
        .audit_events()
        .await
        .iter()
        .filter(|e| e.action_type == action_types::SURVEY_ARCHIVE)
        .count();
    assert_eq!(archives, 1);
}

#[tokio::test]
async fn restore_returns_survey_to_active_list() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let manager = app.user(Role::Manager).await;
    let token = token_for(manager);
    let id = app.survey(client, manager, "in_writing", 1).await;

    post_empty(app.router(), &format!("/api/v1/surveys/{id}/archive"), &token).await;
    let json = body_json(get_auth(app.router(), "/api/v1/surveys", &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let response =
        post_empty(app.router(), &format!("/api/v1/surveys/{id}/restore"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(get_auth(app.router(), "/api/v1/surveys", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Dashboard and reminders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_counts_active_visible_surveys() {
    let app = memory_app().await;
    let acme = app.client("Acme").await;
    let globex = app.client("Globex").await;
    let manager = app.user(Role::Manager).await;
    let token = token_for(manager);

    app.survey(acme, manager, "received", 10).await;
    app.survey(acme, manager, "completed", 30).await;
    app.survey(globex, manager, "in_writing", 1).await;
    let archived = app.survey(globex, manager, "received", 40).await;
    post_empty(app.router(), &format!("/api/v1/surveys/{archived}/archive"), &token).await;

    let response = get_auth(app.router(), "/api/v1/dashboard", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["total"], 3);
    assert_eq!(data["stuck_total"], 1);
    let by_client = data["by_client"].as_array().unwrap();
    let acme_row = by_client
        .iter()
        .find(|c| c["client_name"] == "Acme")
        .unwrap();
    assert_eq!(acme_row["count"], 2);
    assert_eq!(data["by_status"].as_array().unwrap().len(), 3);

    let json = body_json(
        get_auth(app.router(), "/api/v1/dashboard?include_zero_statuses=true", &token).await,
    )
    .await;
    assert_eq!(json["data"]["by_status"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn completion_trend_counts_the_month_work_was_completed() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let manager = app.user(Role::Manager).await;
    let token = token_for(manager);
    let id = app.survey(client, manager, "in_writing", 70).await;

    let response = patch_json(
        app.router(),
        &format!("/api/v1/surveys/{id}"),
        &token,
        json!({ "field": "status", "value": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let now = Utc::now();
    let created = now - Duration::days(70) - Duration::hours(1);
    let bucket = |trend: &serde_json::Value, at: chrono::DateTime<Utc>| {
        trend
            .as_array()
            .unwrap()
            .iter()
            .find(|b| b["year"] == at.year() && b["month"] == at.month())
            .cloned()
            .unwrap()
    };

    let json = body_json(get_auth(app.router(), "/api/v1/dashboard", &token).await).await;
    let trend = &json["data"]["monthly_trend"];
    assert_eq!(trend.as_array().unwrap().len(), 1);
    assert_eq!(bucket(trend, created)["completed"], 1);

    let json = body_json(
        get_auth(app.router(), "/api/v1/dashboard?trend=completion", &token).await,
    )
    .await;
    let trend = &json["data"]["monthly_trend"];
    assert_eq!(trend.as_array().unwrap().len(), 2);
    assert_eq!(bucket(trend, created)["created"], 1);
    assert_eq!(bucket(trend, created)["completed"], 0);
    assert_eq!(bucket(trend, now)["created"], 0);
    assert_eq!(bucket(trend, now)["completed"], 1);

    let response = get_auth(app.router(), "/api/v1/dashboard?trend=weekly", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reminders_skip_scheduled_meetings() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let user = app.user(Role::Surveyor).await;
    let token = token_for(user);

    let waiting = app.survey(client, user, "received", 12).await;
    let older = app.survey(client, user, "email_sent_to_admin", 20).await;
    app.survey(client, user, "meeting_scheduled", 20).await;
    app.survey(client, user, "completed", 20).await;
    app.survey(client, user, "received", 2).await;

    let json = body_json(get_auth(app.router(), "/api/v1/dashboard/stuck", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let json = body_json(get_auth(app.router(), "/api/v1/reminders", &token).await).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["survey_id"], json!(older.to_string()));
    assert_eq!(items[1]["survey_id"], json!(waiting.to_string()));
    assert_eq!(items[1]["days_since_update"], 12);
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_admin_can_update_settings() {
    let app = memory_app().await;
    let manager = app.user(Role::Manager).await;

    let response = put_json(
        app.router(),
        "/api/v1/settings",
        &token_for(manager),
        json!({ "stuck_threshold_days": 14 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn threshold_change_affects_stuck_list() {
    let app = memory_app().await;
    let client = app.client("Acme").await;
    let admin = app.user(Role::Admin).await;
    let token = token_for(admin);
    app.survey(client, admin, "received", 10).await;

    let json = body_json(get_auth(app.router(), "/api/v1/dashboard/stuck", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = put_json(
        app.router(),
        "/api/v1/settings",
        &token,
        json!({ "stuck_threshold_days": 14 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["stuck_threshold_days"], 14);

    let json = body_json(get_auth(app.router(), "/api/v1/dashboard/stuck", &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let events = app.store.audit_events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action_type, action_types::SETTINGS_CHANGE);
    assert_eq!(events[0].details["stuck_threshold_days"]["new"], 14);
}

#[tokio::test]
async fn out_of_range_threshold_is_rejected() {
    let app = memory_app().await;
    let admin = app.user(Role::Admin).await;

    let response = put_json(
        app.router(),
        "/api/v1/settings",
        &token_for(admin),
        json!({ "stuck_threshold_days": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["field"], "stuck_threshold_days");
    assert!(app.store.audit_events().await.is_empty());
}

#[tokio::test]
async fn status_catalog_applies_colour_overrides() {
    let app = memory_app().await;
    let admin = app.user(Role::Admin).await;
    let token = token_for(admin);

    put_json(
        app.router(),
        "/api/v1/settings",
        &token,
        json!({ "status_colors": { "completed": "#00aa00" } }),
    )
    .await;

    let json = body_json(get_auth(app.router(), "/api/v1/statuses", &token).await).await;
    let catalog = json["data"].as_array().unwrap();
    assert_eq!(catalog.len(), 7);
    assert_eq!(catalog[0]["value"], "received");
    let completed = catalog.iter().find(|c| c["value"] == "completed").unwrap();
    assert_eq!(completed["color"], "#00aa00");
}
