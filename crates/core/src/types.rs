/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse an id the way form and query values are read: anything that is not
/// a non-negative integer becomes `0`.
pub fn parse_id(raw: Option<&str>) -> DbId {
    raw.and_then(|s| s.trim().parse::<DbId>().ok())
        .filter(|id| *id > 0)
        .unwrap_or(0)
}
