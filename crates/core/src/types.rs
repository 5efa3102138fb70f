/// All entity primary keys are UUIDs (issued by Postgres for job rows,
/// by the identity service for users).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
