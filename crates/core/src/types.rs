/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// User id assumed when a request does not carry one.
pub const DEFAULT_USER_ID: DbId = 1;
