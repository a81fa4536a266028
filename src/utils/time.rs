//! Time utilities: timestamp rendering and duration formatting.

use crate::models::Timestamp;
use chrono::{DateTime, Local, SecondsFormat, Utc};

/// RFC 3339 in UTC, second precision. Out-of-range values render as the raw number.
pub fn format_ts(ts: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| ts.to_string())
}

/// `YYYY-MM-DD HH:MM` in the local timezone, for terminal output.
pub fn format_local(ts: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn whole_minutes(ms: i64) -> i64 {
    ms / 60_000
}

/// `01h 05m`, or `42s` below one minute.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    if ms < 60_000 {
        return format!("{}s", ms / 1000);
    }
    let mins = whole_minutes(ms);
    format!("{:02}h {:02}m", mins / 60, mins % 60)
}
