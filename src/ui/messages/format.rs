//! Timestamp and reaction formatting for the message feed.

use chrono::{DateTime, Local, Utc};

/// Reactions offered under every message: (wire value, label)
pub const REACTIONS: [(&str, &str); 3] = [("like", "👍"), ("love", "❤"), ("laugh", "😂")];

/// Human readable age of a message relative to `now`.
///
/// Under a minute is "just now"; after that the largest whole unit of
/// minutes, hours or days is used. Clock skew that puts the message in the
/// future also counts as "just now".
pub fn format_time_difference(sent_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(sent_at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(elapsed.num_days(), "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// Full local timestamp for hover text
pub fn format_absolute(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Label for a reaction kind; unknown kinds are shown verbatim
pub fn reaction_label(kind: &str) -> &str {
    REACTIONS
        .iter()
        .find(|(wire, _)| *wire == kind)
        .map(|(_, label)| *label)
        .unwrap_or(kind)
}
