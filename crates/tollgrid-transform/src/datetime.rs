//! Timestamp, time-of-day and weekday parsing.
//!
//! Coverage data arrives in two shapes: full date-times
//! (`2023-01-02 00:00:00`) or a weekday name column next to a bare time
//! (`Monday`, `05:00:00`). Both resolve to a [`WeekPoint`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// A position in the week: weekday plus time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekPoint {
    pub weekday: Weekday,
    pub time: NaiveTime,
}

impl From<NaiveDateTime> for WeekPoint {
    fn from(value: NaiveDateTime) -> Self {
        Self {
            weekday: value.weekday(),
            time: value.time(),
        }
    }
}

/// Parses a full date-time. A bare date resolves to midnight.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parses a time of day (`HH:MM:SS`, optional fraction, or `HH:MM`).
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
}

/// Parses an English weekday name, full or abbreviated, any case.
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    match value.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Full English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Formats a time of day as `HH:MM:SS`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Resolves a timestamp cell, falling back to a separate weekday cell when
/// the timestamp only carries a time of day.
pub fn resolve_week_point(timestamp: &str, weekday: Option<&str>) -> Option<WeekPoint> {
    if let Some(parsed) = parse_datetime(timestamp) {
        return Some(parsed.into());
    }
    let weekday = parse_weekday(weekday?)?;
    let time = parse_time(timestamp)?;
    Some(WeekPoint { weekday, time })
}
