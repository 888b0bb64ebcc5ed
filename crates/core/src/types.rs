/// Integer primary keys (`BIGSERIAL`) used by `users` and `videos`.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
