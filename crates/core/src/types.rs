/// Database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Account that owns dogs and receives alerts (`users.id`).
pub type OwnerId = DbId;

/// The animal an analysis was recorded for (`dogs.id`).
pub type DogId = DbId;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
