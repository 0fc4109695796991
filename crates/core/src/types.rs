use chrono::{FixedOffset, NaiveDate, Offset, Utc};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// India Standard Time offset, UTC+05:30.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The business runs on India Standard Time: quotation dates and mail
/// timestamps are shown in it.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Calendar date in India at the instant `at`.
pub fn ist_date(at: Timestamp) -> NaiveDate {
    at.with_timezone(&ist()).date_naive()
}
