//! Wall-clock helpers

use chrono::{DateTime, Local};

/// Current local time, used to stamp events
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Format a DateTime for display with full date and time.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
