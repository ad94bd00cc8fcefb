/// Primary keys for clips and generated videos (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp used for `created_at` / `completed_at` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Durations of clips and plan segments, in decimal seconds.
pub type Seconds = f64;
