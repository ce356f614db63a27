//! Dashboard aggregation over a scoped survey collection.
//!
//! [`aggregate`] is pure: given the same surveys, settings and `now` it
//! returns the same result. Callers scope the collection to the requesting
//! user before calling. Archived surveys are skipped here as well, so the
//! per-status counts always sum to the number of active surveys passed in.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use serde::Serialize;

use crate::history::TrackedField;
use crate::settings::SystemSettings;
use crate::staleness::{days_since_update, is_stuck};
use crate::status::{self, SurveyStatus, STATUS_COMPLETED};
use crate::survey::{HistoryEntry, Survey};
use crate::types::{DbId, Timestamp};

/// Bucket name for surveys whose client name could not be resolved.
pub const UNKNOWN_CLIENT: &str = "unknown";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    /// Emit a row for every catalog status, even with zero surveys.
    pub include_zero_statuses: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientCount {
    /// `None` for the [`UNKNOWN_CLIENT`] bucket.
    pub client_id: Option<DbId>,
    pub client_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub status: String,
    pub label: String,
    pub color: String,
    pub count: usize,
    /// Mean days since last update; `0.0` for an empty bucket.
    pub average_age_days: f64,
    pub stuck_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerCount {
    pub owner_user_id: DbId,
    pub count: usize,
}

/// Canonical month key; display formatting is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(ts: Timestamp) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub created: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    pub total: usize,
    pub stuck_total: usize,
    pub by_client: Vec<ClientCount>,
    pub by_status: Vec<StatusSummary>,
    pub by_owner: Vec<OwnerCount>,
    pub monthly_trend: Vec<MonthlyBucket>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute every dashboard series in one pass over the active surveys.
pub fn aggregate(
    surveys: &[Survey],
    settings: &SystemSettings,
    options: AggregateOptions,
    now: Timestamp,
) -> AggregateResult {
    let active: Vec<&Survey> = surveys.iter().filter(|s| !s.is_archived).collect();

    let by_status = status_summaries(&active, settings, options, now);
    let stuck_total = by_status.iter().map(|s| s.stuck_count).sum();

    AggregateResult {
        total: active.len(),
        stuck_total,
        by_client: client_counts(&active),
        by_status,
        by_owner: owner_counts(&active),
        monthly_trend: trend_for(&active),
    }
}

fn client_counts(surveys: &[&Survey]) -> Vec<ClientCount> {
    let mut known: HashMap<DbId, (String, usize)> = HashMap::new();
    let mut unknown = 0usize;

    for s in surveys {
        match s.client_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                let entry = known
                    .entry(s.client_id)
                    .or_insert_with(|| (name.to_string(), 0));
                entry.1 += 1;
            }
            _ => unknown += 1,
        }
    }

    let mut counts: Vec<ClientCount> = known
        .into_iter()
        .map(|(client_id, (client_name, count))| ClientCount {
            client_id: Some(client_id),
            client_name,
            count,
        })
        .collect();
    if unknown > 0 {
        counts.push(ClientCount {
            client_id: None,
            client_name: UNKNOWN_CLIENT.to_string(),
            count: unknown,
        });
    }
    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.client_name.cmp(&b.client_name))
    });
    counts
}

/// Sort key placing catalog statuses first, in catalog order, then any
/// unknown raw values alphabetically.
fn status_sort_key(raw: &str) -> (usize, String) {
    match SurveyStatus::from_str_value(raw) {
        Ok(s) => (s.position(), String::new()),
        Err(_) => (SurveyStatus::ALL.len(), raw.to_string()),
    }
}

fn status_summaries(
    surveys: &[&Survey],
    settings: &SystemSettings,
    options: AggregateOptions,
    now: Timestamp,
) -> Vec<StatusSummary> {
    #[derive(Default)]
    struct Acc {
        count: usize,
        age_sum: i64,
        stuck: usize,
    }

    let mut buckets: BTreeMap<(usize, String), (String, Acc)> = BTreeMap::new();

    if options.include_zero_statuses {
        for s in SurveyStatus::ALL {
            buckets.insert(
                status_sort_key(s.as_str()),
                (s.as_str().to_string(), Acc::default()),
            );
        }
    }

    for s in surveys {
        let (_, acc) = buckets
            .entry(status_sort_key(&s.status))
            .or_insert_with(|| (s.status.clone(), Acc::default()));
        acc.count += 1;
        acc.age_sum += days_since_update(s, now);
        if is_stuck(s, settings.stuck_threshold_days, now) {
            acc.stuck += 1;
        }
    }

    buckets
        .into_values()
        .map(|(raw, acc)| StatusSummary {
            label: status::label_for_raw(&raw),
            color: settings.color_for(&raw),
            count: acc.count,
            average_age_days: if acc.count == 0 {
                0.0
            } else {
                acc.age_sum as f64 / acc.count as f64
            },
            stuck_count: acc.stuck,
            status: raw,
        })
        .collect()
}

fn owner_counts(surveys: &[&Survey]) -> Vec<OwnerCount> {
    let mut counts: HashMap<DbId, usize> = HashMap::new();
    for s in surveys {
        *counts.entry(s.owner_user_id).or_default() += 1;
    }
    let mut out: Vec<OwnerCount> = counts
        .into_iter()
        .map(|(owner_user_id, count)| OwnerCount {
            owner_user_id,
            count,
        })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.owner_user_id.cmp(&b.owner_user_id))
    });
    out
}

fn trend_for(surveys: &[&Survey]) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<MonthKey, (usize, usize)> = BTreeMap::new();
    for s in surveys {
        let bucket = months.entry(MonthKey::of(s.created_at)).or_default();
        bucket.0 += 1;
        if s.is_completed() {
            bucket.1 += 1;
        }
    }
    into_buckets(months)
}

fn into_buckets(months: BTreeMap<MonthKey, (usize, usize)>) -> Vec<MonthlyBucket> {
    months
        .into_iter()
        .map(|(key, (created, completed))| MonthlyBucket {
            year: key.year,
            month: key.month,
            created,
            completed,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Monthly trend variants
// ---------------------------------------------------------------------------

/// Monthly trend with `completed` attributed to the month a survey was
/// *created* in, counting surveys whose current status is completed.
///
/// This is the dashboard's established behaviour. It undercounts work
/// completed in a later month than it was created; see
/// [`monthly_completions_from_history`] for the attribution by completion
/// month.
pub fn monthly_trend_by_creation_month(surveys: &[Survey]) -> Vec<MonthlyBucket> {
    let active: Vec<&Survey> = surveys.iter().filter(|s| !s.is_archived).collect();
    trend_for(&active)
}

/// Monthly trend with `completed` attributed to the month of the history
/// entry that last moved each survey to `completed`.
///
/// Only surveys whose current status is completed are counted, so a
/// survey reopened after completion does not contribute. A completed
/// survey with no matching history entry falls back to its `updated_at`.
pub fn monthly_completions_from_history(
    surveys: &[Survey],
    history: &[HistoryEntry],
) -> Vec<MonthlyBucket> {
    let mut last_completion: HashMap<DbId, Timestamp> = HashMap::new();
    for entry in history {
        if entry.field_name == TrackedField::Status.as_str()
            && entry.new_value.as_deref() == Some(STATUS_COMPLETED)
        {
            let at = last_completion.entry(entry.survey_id).or_insert(entry.created_at);
            if entry.created_at > *at {
                *at = entry.created_at;
            }
        }
    }

    let mut months: BTreeMap<MonthKey, (usize, usize)> = BTreeMap::new();
    for s in surveys.iter().filter(|s| !s.is_archived) {
        months.entry(MonthKey::of(s.created_at)).or_default().0 += 1;
        if s.is_completed() {
            let at = last_completion.get(&s.id).copied().unwrap_or(s.updated_at);
            months.entry(MonthKey::of(at)).or_default().1 += 1;
        }
    }
    into_buckets(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{survey, ts};
    use chrono::Duration;
    use uuid::Uuid;

    fn settings(threshold: i32) -> SystemSettings {
        SystemSettings {
            stuck_threshold_days: threshold,
            ..SystemSettings::default()
        }
    }

    #[test]
    fn status_counts_sum_to_active_total() {
        let now = ts(2024, 5, 1, 0, 0);
        let owner = Uuid::new_v4();
        let mut archived = survey("received", owner, now);
        archived.is_archived = true;
        let surveys = vec![
            survey("received", owner, now),
            survey("received", owner, now),
            survey("in_writing", owner, now),
            survey("legacy_state", owner, now),
            archived,
        ];

        let result = aggregate(&surveys, &settings(7), AggregateOptions::default(), now);
        let sum: usize = result.by_status.iter().map(|s| s.count).sum();
        assert_eq!(result.total, 4);
        assert_eq!(sum, 4);
    }

    #[test]
    fn dashboards_show_only_present_statuses_by_default() {
        let now = ts(2024, 5, 1, 0, 0);
        let surveys = vec![survey("chen_review", Uuid::new_v4(), now)];
        let result = aggregate(&surveys, &settings(7), AggregateOptions::default(), now);
        assert_eq!(result.by_status.len(), 1);
        assert_eq!(result.by_status[0].status, "chen_review");
        assert_eq!(result.by_status[0].label, "Chen review");
    }

    #[test]
    fn zero_statuses_are_included_on_request_with_zero_average() {
        let now = ts(2024, 5, 1, 0, 0);
        let surveys = vec![survey("completed", Uuid::new_v4(), now)];
        let options = AggregateOptions {
            include_zero_statuses: true,
        };
        let result = aggregate(&surveys, &settings(7), options, now);
        assert_eq!(result.by_status.len(), 7);
        let received = &result.by_status[0];
        assert_eq!(received.status, "received");
        assert_eq!(received.count, 0);
        assert_eq!(received.average_age_days, 0.0);
        assert!(!received.average_age_days.is_nan());
        assert_eq!(result.by_status[6].status, "completed");
        assert_eq!(result.by_status[6].count, 1);
    }

    #[test]
    fn unknown_statuses_sort_after_catalog() {
        let now = ts(2024, 5, 1, 0, 0);
        let owner = Uuid::new_v4();
        let surveys = vec![
            survey("zz_legacy", owner, now),
            survey("completed", owner, now),
            survey("received", owner, now),
        ];
        let result = aggregate(&surveys, &settings(7), AggregateOptions::default(), now);
        let order: Vec<&str> = result.by_status.iter().map(|s| s.status.as_str()).collect();
        assert_eq!(order, vec!["received", "completed", "zz_legacy"]);
        assert_eq!(result.by_status[2].label, "zz_legacy");
        assert_eq!(result.by_status[2].color, status::FALLBACK_COLOR);
    }

    #[test]
    fn average_age_and_stuck_count_per_status() {
        let now = ts(2024, 5, 20, 12, 0);
        let owner = Uuid::new_v4();
        let surveys = vec![
            survey("in_writing", owner, now - Duration::days(2)),
            survey("in_writing", owner, now - Duration::days(10)),
            survey("completed", owner, now - Duration::days(30)),
        ];
        let result = aggregate(&surveys, &settings(5), AggregateOptions::default(), now);

        let in_writing = result
            .by_status
            .iter()
            .find(|s| s.status == "in_writing")
            .unwrap();
        assert_eq!(in_writing.average_age_days, 6.0);
        assert_eq!(in_writing.stuck_count, 1);

        let completed = result
            .by_status
            .iter()
            .find(|s| s.status == "completed")
            .unwrap();
        assert_eq!(completed.stuck_count, 0);
        assert_eq!(result.stuck_total, 1);
    }

    #[test]
    fn missing_client_names_go_to_unknown_bucket() {
        let now = ts(2024, 5, 1, 0, 0);
        let owner = Uuid::new_v4();
        let mut orphan_a = survey("received", owner, now);
        orphan_a.client_name = None;
        let mut orphan_b = survey("received", owner, now);
        orphan_b.client_name = Some("  ".to_string());
        let client = Uuid::new_v4();
        let mut a1 = survey("received", owner, now);
        a1.client_id = client;
        let mut a2 = a1.clone();
        a2.id = Uuid::new_v4();
        let mut a3 = a1.clone();
        a3.id = Uuid::new_v4();

        let result = aggregate(
            &[orphan_a, orphan_b, a1, a2, a3],
            &settings(7),
            AggregateOptions::default(),
            now,
        );
        assert_eq!(result.by_client.len(), 2);
        assert_eq!(result.by_client[0].client_id, Some(client));
        assert_eq!(result.by_client[0].count, 3);
        assert_eq!(result.by_client[1].client_name, UNKNOWN_CLIENT);
        assert_eq!(result.by_client[1].client_id, None);
        assert_eq!(result.by_client[1].count, 2);
    }

    #[test]
    fn owner_counts_cover_every_survey() {
        let now = ts(2024, 5, 1, 0, 0);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let surveys = vec![
            survey("received", a, now),
            survey("received", a, now),
            survey("received", a, now),
            survey("received", b, now),
            survey("received", b, now),
        ];
        let result = aggregate(&surveys, &settings(7), AggregateOptions::default(), now);
        assert_eq!(
            result.by_owner,
            vec![
                OwnerCount { owner_user_id: a, count: 3 },
                OwnerCount { owner_user_id: b, count: 2 },
            ]
        );
    }

    #[test]
    fn monthly_trend_attributes_completion_to_creation_month() {
        let owner = Uuid::new_v4();
        let mut jan_done = survey("in_writing", owner, ts(2024, 1, 5, 9, 0));
        jan_done.status = "completed".to_string();
        jan_done.updated_at = ts(2024, 3, 2, 9, 0);
        let surveys = vec![
            jan_done,
            survey("received", owner, ts(2024, 1, 20, 9, 0)),
            survey("received", owner, ts(2024, 2, 3, 9, 0)),
        ];

        let trend = monthly_trend_by_creation_month(&surveys);
        assert_eq!(
            trend,
            vec![
                MonthlyBucket { year: 2024, month: 1, created: 2, completed: 1 },
                MonthlyBucket { year: 2024, month: 2, created: 1, completed: 0 },
            ]
        );

        let now = ts(2024, 4, 1, 0, 0);
        let result = aggregate(&surveys, &settings(7), AggregateOptions::default(), now);
        assert_eq!(result.monthly_trend, trend);
    }

    #[test]
    fn trend_keys_span_year_boundary_in_order() {
        let owner = Uuid::new_v4();
        let surveys = vec![
            survey("received", owner, ts(2024, 1, 1, 0, 0)),
            survey("received", owner, ts(2023, 12, 31, 23, 0)),
        ];
        let trend = monthly_trend_by_creation_month(&surveys);
        assert_eq!((trend[0].year, trend[0].month), (2023, 12));
        assert_eq!((trend[1].year, trend[1].month), (2024, 1));
    }

    #[test]
    fn history_variant_attributes_completion_to_completion_month() {
        let owner = Uuid::new_v4();
        let actor = Uuid::new_v4();
        let mut done = survey("completed", owner, ts(2024, 1, 5, 9, 0));
        done.updated_at = ts(2024, 3, 9, 9, 0);
        let history = vec![
            HistoryEntry {
                id: Uuid::new_v4(),
                survey_id: done.id,
                field_name: "status".to_string(),
                old_value: Some("chen_review".to_string()),
                new_value: Some("completed".to_string()),
                user_id: actor,
                created_at: ts(2024, 2, 14, 9, 0),
            },
            HistoryEntry {
                id: Uuid::new_v4(),
                survey_id: done.id,
                field_name: "system_name".to_string(),
                old_value: Some("a".to_string()),
                new_value: Some("b".to_string()),
                user_id: actor,
                created_at: ts(2024, 3, 9, 9, 0),
            },
        ];

        let trend = monthly_completions_from_history(&[done], &history);
        assert_eq!(
            trend,
            vec![
                MonthlyBucket { year: 2024, month: 1, created: 1, completed: 0 },
                MonthlyBucket { year: 2024, month: 2, created: 0, completed: 1 },
            ]
        );
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let now = ts(2024, 5, 1, 0, 0);
        let result = aggregate(&[], &settings(7), AggregateOptions::default(), now);
        assert_eq!(result.total, 0);
        assert!(result.by_status.is_empty());
        assert!(result.by_client.is_empty());
        assert!(result.monthly_trend.is_empty());
    }
}
