//! Small formatting helpers shared by the terminal views, the web pages and
//! the exporters, so a percentage or a timestamp reads the same everywhere.

use crate::libs::messages::Message;
use chrono::{Local, NaiveDateTime, Utc};

/// Timestamp layout used for every `created_at`/`expires_at` column.
///
/// Fixed width and zero padded, so SQL string comparison orders it correctly.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Local wall-clock time, for rows the user sees.
pub fn now_local() -> String {
    Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string()
}

/// UTC time, for session expiry.
pub fn now_utc() -> String {
    format_timestamp(&Utc::now().naive_utc())
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Renders an attendance percentage with one decimal, or "no data".
pub fn format_percentage(percentage: Option<f64>) -> String {
    match percentage {
        Some(value) => format!("{:.1}%", value),
        None => Message::AttendanceNoData.to_string(),
    }
}

/// Renders an optional text column, using "-" for missing values.
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}
