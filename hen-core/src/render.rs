//! Pure Markdown rendering helpers.
//!
//! ```text
//! # Họp nhóm
//!
//! - **Start:** Sat, 08/11/2025 10:00
//! - **Location:** phòng 302
//! - **Reminder:** 30 min before
//! ```

use crate::extraction::{EventTime, ExtractionResult};

/// Shown instead of the title when no event name was found.
pub const UNTITLED: &str = "(untitled)";

/// Render one extraction result as a Markdown card.
pub fn format_result(result: &ExtractionResult, datetime_format: &str) -> String {
    let title = result.event_name.as_deref().unwrap_or(UNTITLED);
    let mut out = format!("# {title}\n\n");

    match &result.start_time {
        Some(start) => {
            out.push_str(&format!("- **Start:** {}\n", format_time(start, datetime_format)));
        }
        None => out.push_str("- **Start:** _not found_\n"),
    }
    if let Some(end) = &result.end_time {
        out.push_str(&format!("- **End:** {}\n", format_time(end, datetime_format)));
    }
    if let Some(location) = &result.location {
        out.push_str(&format!("- **Location:** {location}\n"));
    }
    if result.reminder_minutes > 0 {
        out.push_str(&format!(
            "- **Reminder:** {} before\n",
            format_minutes(result.reminder_minutes)
        ));
    }
    out
}

/// Formats a date-time according to the user's configuration, followed by
/// its UTC offset when it carries one.
pub fn format_time(time: &EventTime, datetime_format: &str) -> String {
    let local = time.naive().format(datetime_format).to_string();
    match time.offset() {
        Some(offset) => format!("{local} (UTC{offset})"),
        None => local,
    }
}

/// `90` → `1 h 30 min`.
fn format_minutes(minutes: u32) -> String {
    let (days, hours, mins) = (minutes / 1440, minutes % 1440 / 60, minutes % 60);
    let parts: Vec<String> = [(days, "d"), (hours, "h"), (mins, "min")]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{n} {unit}"))
        .collect();
    parts.join(" ")
}
