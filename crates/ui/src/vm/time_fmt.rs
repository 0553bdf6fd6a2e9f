use chrono::{DateTime, Local, Utc};

/// Local wall-clock time, as shown in the activity history.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
