use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Offset-less timestamp layouts, read as UTC.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Normalizes a record date into a `YYYY-MM-DD` UTC calendar day.
///
/// Accepts RFC 3339 timestamps (converted to UTC first), offset-less
/// timestamps and plain calendar days. Returns `None` for anything else.
///
/// ```rust
/// use insights::normalize_day;
///
/// assert_eq!(normalize_day("2024-01-05").as_deref(), Some("2024-01-05"));
/// assert_eq!(
///     normalize_day("2024-01-05T23:30:00-02:00").as_deref(),
///     Some("2024-01-06")
/// );
/// assert_eq!(normalize_day("yesterday"), None);
/// ```
#[must_use]
pub fn normalize_day(raw: &str) -> Option<String> {
    parse_day(raw.trim()).map(|day| day.format(DAY_FORMAT).to_string())
}

/// Returns `true` if `raw` is exactly a valid `YYYY-MM-DD` day.
#[must_use]
pub fn is_calendar_day(raw: &str) -> bool {
    raw.len() == 10 && NaiveDate::parse_from_str(raw, DAY_FORMAT).is_ok()
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }

    if let Some(ts) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(ts.date());
    }

    NaiveDate::parse_from_str(raw, DAY_FORMAT).ok()
}
