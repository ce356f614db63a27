//! Repository for the `system_settings` singleton.

use sqlx::{PgPool, Postgres, Transaction};
use surveytrack_core::settings::SystemSettings;
use surveytrack_core::types::DbId;

use crate::models::settings::SettingsRow;

const COLUMNS: &str = "stuck_threshold_days, status_colors, updated_by, updated_at";

pub struct SettingsRepo;

impl SettingsRepo {
    /// The singleton row, if seeded.
    pub async fn get(pool: &PgPool) -> Result<Option<SettingsRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_settings WHERE id = 1");
        sqlx::query_as::<_, SettingsRow>(&query)
            .fetch_optional(pool)
            .await
    }

    pub async fn get_for_update(
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<SettingsRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_settings WHERE id = 1 FOR UPDATE");
        sqlx::query_as::<_, SettingsRow>(&query)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Upsert the singleton.
    pub async fn save(
        tx: &mut Transaction<'_, Postgres>,
        settings: &SystemSettings,
        actor: DbId,
    ) -> Result<SettingsRow, sqlx::Error> {
        let colors = serde_json::to_value(&settings.status_colors)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let query = format!(
            "INSERT INTO system_settings (id, stuck_threshold_days, status_colors, updated_by, updated_at) \
             VALUES (1, $1, $2, $3, now()) \
             ON CONFLICT (id) DO UPDATE SET \
                stuck_threshold_days = EXCLUDED.stuck_threshold_days, \
                status_colors = EXCLUDED.status_colors, \
                updated_by = EXCLUDED.updated_by, \
                updated_at = EXCLUDED.updated_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SettingsRow>(&query)
            .bind(settings.stuck_threshold_days)
            .bind(colors)
            .bind(actor)
            .fetch_one(&mut **tx)
            .await
    }
}
