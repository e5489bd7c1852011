//! Display helpers for CLI and log output.

use chrono::{DateTime, Utc};

/// Human-readable byte count, 1024-based.
pub fn file_size(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["bytes", "KB", "MB", "GB", "TB", "PB", "EB"];
    if bytes == 0 {
        return "0 bytes".to_string();
    }
    let exp = (bytes.ilog2() / 10).min(UNITS.len() as u32 - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    if exp == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[exp as usize])
    }
}

/// Render a unix timestamp as a UTC date for display.
pub fn date(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%B %-d, %Y %H:%M UTC").to_string(),
        None => format!("@{}", timestamp),
    }
}

/// Time left until an unlock instant, split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    /// `None` once the unlock instant has passed.
    pub fn until(unlock_time: i64, now: i64) -> Option<Self> {
        let total = unlock_time - now;
        if total <= 0 {
            return None;
        }
        Some(Self {
            days: total / 86_400,
            hours: (total / 3_600) % 24,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        })
    }
}

/// Human phrasing of the remaining time: the two most significant units,
/// "Unlocked" once the instant has passed.
pub fn time_remaining(unlock_time: i64, now: i64) -> String {
    let Some(remaining) = TimeRemaining::until(unlock_time, now) else {
        return "Unlocked".to_string();
    };

    let mut parts = Vec::new();
    if remaining.days > 0 {
        parts.push(plural(remaining.days, "day"));
    }
    if remaining.hours > 0 {
        parts.push(plural(remaining.hours, "hour"));
    }
    if remaining.minutes > 0 && remaining.days == 0 {
        parts.push(plural(remaining.minutes, "minute"));
    }
    if remaining.seconds > 0 && remaining.days == 0 && remaining.hours == 0 {
        parts.push(plural(remaining.seconds, "second"));
    }

    match parts.len() {
        0 => "Less than a second".to_string(),
        1 => parts.remove(0),
        2 => format!("{} and {}", parts[0], parts[1]),
        _ => parts.join(", "),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
