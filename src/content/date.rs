//! Strict calendar-date parsing for front-matter `date` fields

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Date-time layouts read as UTC when no offset is given
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a front-matter date.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, and ISO date-times without
/// an offset (read as UTC). Anything else is an error rather than a
/// placeholder date.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("date is empty".to_string());
    }

    // chrono's %Y/%m/%d accept signs and short fields; require a literal YYYY-MM-DD prefix
    if !has_calendar_prefix(s) {
        return Err(format!("{:?} does not start with a YYYY-MM-DD date", s));
    }

    if s.len() == 10 {
        let d = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("{:?}: {}", s, e))?;
        return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc());
        }
    }

    Err(format!("{:?} is not a YYYY-MM-DD date or ISO 8601 date-time", s))
}

/// `YYYY-MM-DD` with ASCII digits in every field position
fn has_calendar_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
