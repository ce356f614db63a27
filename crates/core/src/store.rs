//! The persistence/identity collaborator contract.
//!
//! The lifecycle logic in this crate never performs I/O itself. Services
//! fetch records through a [`SurveyStore`] and hand them to the pure
//! functions. Every fetch takes the caller's [`VisibilityScope`] so scoping
//! happens at the query boundary.
//!
//! [`MemorySurveyStore`] is a complete in-process implementation used by
//! tests and embedders; the PostgreSQL implementation lives in the db crate.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::audit::{action_types, entity_types, NewAuditLog};
use crate::error::CoreError;
use crate::history::{plan_field_update, SurveyFieldUpdate, TrackedField};
use crate::roles::VisibilityScope;
use crate::settings::{settings_change_details, SystemSettings};
use crate::survey::{Client, HistoryEntry, NewSurvey, Survey, UserProfile};
use crate::types::DbId;

#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Surveys visible under `scope`, archived ones included, newest first.
    async fn fetch_surveys(&self, scope: VisibilityScope) -> Result<Vec<Survey>, CoreError>;

    async fn fetch_survey(&self, id: DbId) -> Result<Survey, CoreError>;

    /// Insert a survey and its `survey_create` audit event atomically.
    async fn create_survey(&self, input: NewSurvey, owner: DbId) -> Result<Survey, CoreError>;

    /// Apply one field update. When a tracked field changes, exactly one
    /// history entry is written with it, atomically. An archive or restore
    /// that changes the flag also writes its audit event in the same unit.
    async fn update_survey_field(
        &self,
        id: DbId,
        update: SurveyFieldUpdate,
        actor: DbId,
    ) -> Result<Survey, CoreError>;

    /// Permanently delete a survey and record `survey_delete` atomically.
    /// Fails with `Conflict` unless archived.
    async fn delete_archived_survey(&self, id: DbId, actor: DbId) -> Result<(), CoreError>;

    /// History of one survey, newest first.
    async fn fetch_history(&self, survey_id: DbId) -> Result<Vec<HistoryEntry>, CoreError>;

    /// `status` history entries for every survey in `survey_ids`, in one
    /// read. Unknown ids contribute nothing.
    async fn fetch_status_history(
        &self,
        survey_ids: &[DbId],
    ) -> Result<Vec<HistoryEntry>, CoreError>;

    async fn fetch_system_settings(&self) -> Result<SystemSettings, CoreError>;

    /// Replace the settings singleton and record a `settings_change` audit
    /// event naming the changed keys.
    async fn update_system_settings(
        &self,
        settings: SystemSettings,
        actor: DbId,
    ) -> Result<SystemSettings, CoreError>;

    async fn fetch_profile(&self, user_id: DbId) -> Result<Option<UserProfile>, CoreError>;
}

/// The `survey_delete` event, naming the system so the log stays readable
/// after the row is gone.
pub fn survey_deleted_event(actor: DbId, survey: &Survey) -> NewAuditLog {
    NewAuditLog::new(
        actor,
        action_types::SURVEY_DELETE,
        entity_types::SURVEY,
        Some(survey.id),
    )
    .with_details(serde_json::json!({ "system_name": survey.system_name }))
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    clients: HashMap<DbId, Client>,
    /// Insertion order is kept so listing is deterministic.
    surveys: Vec<Survey>,
    history: Vec<HistoryEntry>,
    settings: SystemSettings,
    profiles: HashMap<DbId, UserProfile>,
    audit: Vec<NewAuditLog>,
}

impl MemoryState {
    fn with_client_name(&self, mut survey: Survey) -> Survey {
        survey.client_name = self.clients.get(&survey.client_id).map(|c| c.name.clone());
        survey
    }

    fn position(&self, id: DbId) -> Result<usize, CoreError> {
        self.surveys
            .iter()
            .position(|s| s.id == id)
            .ok_or(CoreError::NotFound {
                entity: "survey",
                id,
            })
    }
}

/// Thread-safe in-memory [`SurveyStore`].
#[derive(Debug, Default)]
pub struct MemorySurveyStore {
    state: RwLock<MemoryState>,
}

impl MemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_client(&self, client: Client) {
        self.state.write().await.clients.insert(client.id, client);
    }

    pub async fn insert_profile(&self, profile: UserProfile) {
        self.state.write().await.profiles.insert(profile.id, profile);
    }

    /// Seed a survey as-is, bypassing creation defaults and history.
    pub async fn insert_survey(&self, survey: Survey) {
        self.state.write().await.surveys.push(survey);
    }

    /// Audit events recorded so far, oldest first.
    pub async fn audit_events(&self) -> Vec<NewAuditLog> {
        self.state.read().await.audit.clone()
    }
}

#[async_trait]
impl SurveyStore for MemorySurveyStore {
    async fn fetch_surveys(&self, scope: VisibilityScope) -> Result<Vec<Survey>, CoreError> {
        let state = self.state.read().await;
        let mut surveys: Vec<Survey> = state
            .surveys
            .iter()
            .filter(|s| scope.permits_owner(s.owner_user_id))
            .map(|s| state.with_client_name(s.clone()))
            .collect();
        surveys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(surveys)
    }

    async fn fetch_survey(&self, id: DbId) -> Result<Survey, CoreError> {
        let state = self.state.read().await;
        let index = state.position(id)?;
        Ok(state.with_client_name(state.surveys[index].clone()))
    }

    async fn create_survey(&self, input: NewSurvey, owner: DbId) -> Result<Survey, CoreError> {
        input.validate()?;
        let mut state = self.state.write().await;
        if !state.clients.contains_key(&input.client_id) {
            return Err(CoreError::NotFound {
                entity: "client",
                id: input.client_id,
            });
        }
        let survey = input.into_survey(uuid::Uuid::new_v4(), owner, Utc::now());
        state.surveys.push(survey.clone());
        state.audit.push(NewAuditLog::new(
            owner,
            action_types::SURVEY_CREATE,
            entity_types::SURVEY,
            Some(survey.id),
        ));
        Ok(state.with_client_name(survey))
    }

    async fn update_survey_field(
        &self,
        id: DbId,
        update: SurveyFieldUpdate,
        actor: DbId,
    ) -> Result<Survey, CoreError> {
        let mut state = self.state.write().await;
        let index = state.position(id)?;
        if let SurveyFieldUpdate::ClientId(client_id) = update {
            if !state.clients.contains_key(&client_id) {
                return Err(CoreError::NotFound {
                    entity: "client",
                    id: client_id,
                });
            }
        }

        let plan = plan_field_update(&state.surveys[index], &update, actor, Utc::now())?;
        if let Some(entry) = plan.history {
            state.history.push(HistoryEntry {
                id: uuid::Uuid::new_v4(),
                survey_id: entry.survey_id,
                field_name: entry.field_name,
                old_value: entry.old_value,
                new_value: entry.new_value,
                user_id: entry.user_id,
                created_at: entry.created_at,
            });
        }
        if let Some(event) = plan.audit {
            state.audit.push(event);
        }
        state.surveys[index] = plan.updated.clone();
        Ok(state.with_client_name(plan.updated))
    }

    async fn delete_archived_survey(&self, id: DbId, actor: DbId) -> Result<(), CoreError> {
        let mut state = self.state.write().await;
        let index = state.position(id)?;
        if !state.surveys[index].is_archived {
            return Err(CoreError::Conflict(
                "Only archived surveys can be deleted".to_string(),
            ));
        }
        let removed = state.surveys.remove(index);
        state.history.retain(|h| h.survey_id != id);
        state.audit.push(survey_deleted_event(actor, &removed));
        Ok(())
    }

    async fn fetch_history(&self, survey_id: DbId) -> Result<Vec<HistoryEntry>, CoreError> {
        let state = self.state.read().await;
        state.position(survey_id)?;
        let mut entries: Vec<HistoryEntry> = state
            .history
            .iter()
            .filter(|h| h.survey_id == survey_id)
            .cloned()
            .collect();
        entries.reverse();
        Ok(entries)
    }

    async fn fetch_status_history(
        &self,
        survey_ids: &[DbId],
    ) -> Result<Vec<HistoryEntry>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .history
            .iter()
            .filter(|h| {
                h.field_name == TrackedField::Status.as_str() && survey_ids.contains(&h.survey_id)
            })
            .cloned()
            .collect())
    }

    async fn fetch_system_settings(&self) -> Result<SystemSettings, CoreError> {
        Ok(self.state.read().await.settings.clone())
    }

    async fn update_system_settings(
        &self,
        settings: SystemSettings,
        actor: DbId,
    ) -> Result<SystemSettings, CoreError> {
        settings.validate()?;
        let mut state = self.state.write().await;
        let details = settings_change_details(&state.settings, &settings);
        state.settings = settings.clone();
        state.audit.push(
            NewAuditLog::new(
                actor,
                action_types::SETTINGS_CHANGE,
                entity_types::SYSTEM_SETTINGS,
                None,
            )
            .with_details(details),
        );
        Ok(settings)
    }

    async fn fetch_profile(&self, user_id: DbId) -> Result<Option<UserProfile>, CoreError> {
        Ok(self.state.read().await.profiles.get(&user_id).cloned())
    }
}
