//! PostgreSQL implementation of the core [`SurveyStore`] contract.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use surveytrack_core::audit::{action_types, entity_types, NewAuditLog};
use surveytrack_core::error::CoreError;
use surveytrack_core::history::{plan_field_update, SurveyFieldUpdate, TrackedField};
use surveytrack_core::roles::VisibilityScope;
use surveytrack_core::settings::{settings_change_details, SystemSettings};
use surveytrack_core::store::{survey_deleted_event, SurveyStore};
use surveytrack_core::survey::{Contact, HistoryEntry, NewSurvey, Survey, UserProfile};
use surveytrack_core::types::DbId;

use crate::repositories::{
    AuditLogRepo, ClientRepo, ContactRepo, HistoryRepo, ProfileRepo, SettingsRepo, SurveyRepo,
};

/// Map a database failure onto the core taxonomy.
///
/// Everything surfaces as `Backend`; row-level absence is handled by the
/// callers, which know the entity and id.
fn backend(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::Backend(err.to_string())
}

#[derive(Clone)]
pub struct PgSurveyStore {
    pool: PgPool,
}

impl PgSurveyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SurveyStore for PgSurveyStore {
    async fn fetch_surveys(&self, scope: VisibilityScope) -> Result<Vec<Survey>, CoreError> {
        let rows = SurveyRepo::list(&self.pool, scope.owner_filter())
            .await
            .map_err(backend)?;
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();

        let mut contacts: HashMap<DbId, Vec<Contact>> = HashMap::new();
        for row in ContactRepo::list_for_surveys(&self.pool, &ids)
            .await
            .map_err(backend)?
        {
            contacts.entry(row.survey_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let survey_contacts = contacts.remove(&row.id).unwrap_or_default();
                row.into_survey(survey_contacts)
            })
            .collect())
    }

    async fn fetch_survey(&self, id: DbId) -> Result<Survey, CoreError> {
        let row = SurveyRepo::find_by_id(&self.pool, id)
            .await
            .map_err(backend)?
            .ok_or(CoreError::NotFound {
                entity: "survey",
                id,
            })?;
        let contacts = ContactRepo::list_for_survey(&self.pool, id)
            .await
            .map_err(backend)?
            .into_iter()
            .map(Contact::from)
            .collect();
        Ok(row.into_survey(contacts))
    }

    async fn create_survey(&self, input: NewSurvey, owner: DbId) -> Result<Survey, CoreError> {
        input.validate()?;
        if ClientRepo::find_by_id(&self.pool, input.client_id)
            .await
            .map_err(backend)?
            .is_none()
        {
            return Err(CoreError::NotFound {
                entity: "client",
                id: input.client_id,
            });
        }

        let survey = input.into_survey(uuid::Uuid::new_v4(), owner, Utc::now());
        let event = NewAuditLog::new(
            owner,
            action_types::SURVEY_CREATE,
            entity_types::SURVEY,
            Some(survey.id),
        );

        let mut tx = self.pool.begin().await.map_err(backend)?;
        let row = SurveyRepo::insert(&mut tx, &survey).await.map_err(backend)?;
        AuditLogRepo::insert(&mut tx, &event)
            .await
            .map_err(backend)?;
        tx.commit().await.map_err(backend)?;

        tracing::info!(survey_id = %row.id, user_id = %owner, "Survey created");
        Ok(row.into_survey(Vec::new()))
    }

    async fn update_survey_field(
        &self,
        id: DbId,
        update: SurveyFieldUpdate,
        actor: DbId,
    ) -> Result<Survey, CoreError> {
        if let SurveyFieldUpdate::ClientId(client_id) = update {
            if ClientRepo::find_by_id(&self.pool, client_id)
                .await
                .map_err(backend)?
                .is_none()
            {
                return Err(CoreError::NotFound {
                    entity: "client",
                    id: client_id,
                });
            }
        }

        let mut tx = self.pool.begin().await.map_err(backend)?;
        let before = SurveyRepo::find_for_update(&mut tx, id)
            .await
            .map_err(backend)?
            .ok_or(CoreError::NotFound {
                entity: "survey",
                id,
            })?
            .into_survey(Vec::new());

        let plan = plan_field_update(&before, &update, actor, Utc::now())?;
        if plan.changed {
            SurveyRepo::write_fields(&mut tx, &plan.updated)
                .await
                .map_err(backend)?;
            if let Some(entry) = &plan.history {
                HistoryRepo::insert(&mut tx, entry).await.map_err(backend)?;
            }
            if let Some(event) = &plan.audit {
                AuditLogRepo::insert(&mut tx, event)
                    .await
                    .map_err(backend)?;
            }
        }
        tx.commit().await.map_err(backend)?;

        if plan.changed {
            tracing::info!(
                survey_id = %id,
                user_id = %actor,
                field = update.field_name(),
                "Survey field updated",
            );
        }

        // Re-read for the joined client name and contacts.
        self.fetch_survey(id).await
    }

    async fn delete_archived_survey(&self, id: DbId, actor: DbId) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let survey = SurveyRepo::find_for_update(&mut tx, id)
            .await
            .map_err(backend)?
            .ok_or(CoreError::NotFound {
                entity: "survey",
                id,
            })?
            .into_survey(Vec::new());
        if !SurveyRepo::delete_archived(&mut tx, id)
            .await
            .map_err(backend)?
        {
            return Err(CoreError::Conflict(
                "Only archived surveys can be deleted".to_string(),
            ));
        }
        AuditLogRepo::insert(&mut tx, &survey_deleted_event(actor, &survey))
            .await
            .map_err(backend)?;
        tx.commit().await.map_err(backend)?;

        tracing::info!(survey_id = %id, user_id = %actor, "Archived survey deleted");
        Ok(())
    }

    async fn fetch_history(&self, survey_id: DbId) -> Result<Vec<HistoryEntry>, CoreError> {
        if !SurveyRepo::exists(&self.pool, survey_id)
            .await
            .map_err(backend)?
        {
            return Err(CoreError::NotFound {
                entity: "survey",
                id: survey_id,
            });
        }
        Ok(HistoryRepo::list_for_survey(&self.pool, survey_id)
            .await
            .map_err(backend)?
            .into_iter()
            .map(HistoryEntry::from)
            .collect())
    }

    async fn fetch_status_history(
        &self,
        survey_ids: &[DbId],
    ) -> Result<Vec<HistoryEntry>, CoreError> {
        if survey_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(HistoryRepo::list_field_for_surveys(
            &self.pool,
            TrackedField::Status.as_str(),
            survey_ids,
        )
        .await
        .map_err(backend)?
        .into_iter()
        .map(HistoryEntry::from)
        .collect())
    }

    async fn fetch_system_settings(&self) -> Result<SystemSettings, CoreError> {
        Ok(SettingsRepo::get(&self.pool)
            .await
            .map_err(backend)?
            .map(|row| row.into_settings())
            .unwrap_or_default())
    }

    async fn update_system_settings(
        &self,
        settings: SystemSettings,
        actor: DbId,
    ) -> Result<SystemSettings, CoreError> {
        settings.validate()?;

        let mut tx = self.pool.begin().await.map_err(backend)?;
        let before = SettingsRepo::get_for_update(&mut tx)
            .await
            .map_err(backend)?
            .map(|row| row.into_settings())
            .unwrap_or_default();
        let saved = SettingsRepo::save(&mut tx, &settings, actor)
            .await
            .map_err(backend)?
            .into_settings();

        let event = NewAuditLog::new(
            actor,
            action_types::SETTINGS_CHANGE,
            entity_types::SYSTEM_SETTINGS,
            None,
        )
        .with_details(settings_change_details(&before, &saved));
        AuditLogRepo::insert(&mut tx, &event)
            .await
            .map_err(backend)?;
        tx.commit().await.map_err(backend)?;

        tracing::info!(user_id = %actor, "System settings updated");
        Ok(saved)
    }

    async fn fetch_profile(&self, user_id: DbId) -> Result<Option<UserProfile>, CoreError> {
        ProfileRepo::find_by_id(&self.pool, user_id)
            .await
            .map_err(backend)?
            .map(|row| row.into_profile())
            .transpose()
    }
}
