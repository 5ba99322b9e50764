use chrono::{DateTime, Datelike, Local};

/// Format timestamp with tiered display:
/// - Relative for <7 days: "2h ago", "3d ago"
/// - Absolute for ≥7 days: "Jan 15", "Dec 3, 2024"
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    format_timestamp_at(timestamp, &Local::now())
}

fn format_timestamp_at(timestamp: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let duration = now.signed_duration_since(*timestamp);

    if duration.num_days() < 7 {
        format_relative(duration.num_seconds())
    } else if timestamp.year() == now.year() {
        timestamp.format("%b %-d").to_string()
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

fn format_relative(seconds: i64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "just now".to_string()
    }
}

/// Clock time shown next to each message
pub fn format_clock(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}
