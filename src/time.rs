use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar day of an ISO-8601 timestamp. Accepts a bare `YYYY-MM-DD` prefix
/// for timestamps that do not parse as full RFC 3339.
pub(crate) fn calendar_day(timestamp: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.date_naive());
    }
    timestamp.get(..10)?.parse().ok()
}

/// Millisecond sort key; unparseable timestamps sort before everything else.
pub(crate) fn sort_key_ms(timestamp: &str) -> i64 {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(i64::MIN)
}
