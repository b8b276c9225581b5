//! Formatting helpers for file listings.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Human readable size: "Unknown" for 0, otherwise KB or MB with two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "Unknown".to_string();
    }
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    if mb >= 1.0 {
        format!("{:.2} MB", mb)
    } else {
        format!("{:.2} KB", kb)
    }
}

/// Relative upload time as seen from `now`, falling back to a short date after a day.
pub fn format_relative_time<Tz: TimeZone>(at: DateTime<Utc>, now: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let at = at.with_timezone(&now.timezone());
    let seconds = (now.clone() - at.clone()).num_seconds();

    if seconds < 60 {
        return "Just now".to_string();
    }
    if seconds < 3600 {
        return format!("{} minutes ago", seconds / 60);
    }
    if seconds < 86_400 {
        return format!("{} hours ago", seconds / 3600);
    }

    if at.year() != now.year() {
        at.format("%b %-d, %Y").to_string()
    } else {
        at.format("%b %-d").to_string()
    }
}

/// Short badge for a MIME type.
pub fn file_badge(file_type: &str) -> &'static str {
    if file_type.contains("pdf") {
        "PDF"
    } else if file_type.contains("image") {
        "IMG"
    } else if file_type.contains("video") {
        "VID"
    } else if file_type.contains("word") || file_type.contains("document") {
        "DOC"
    } else {
        "FILE"
    }
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
