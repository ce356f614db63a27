/// All primary keys are UUIDs (profiles share their id with the identity provider).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates without a time component (survey / received dates).
pub type Date = chrono::NaiveDate;
