//! Weekly timetable types and the parsing of weekdays and class times.
//!
//! Days are numbered 0 (Monday) through 6 (Sunday), matching
//! `chrono::Weekday::num_days_from_monday`. Times are 24-hour `HH:MM`
//! strings, which sort correctly as text.

use super::error::BuddyError;
use super::messages::Message;
use chrono::{Datelike, Local, NaiveTime};
use serde::Serialize;

pub const WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimetableEntry {
    pub id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
}

impl TimetableEntry {
    pub fn day_name(&self) -> &'static str {
        weekday_name(self.day_of_week)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTimetableEntry {
    pub subject_id: i64,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
}

impl NewTimetableEntry {
    /// Normalises both times to `HH:MM` and checks the day and ordering.
    pub fn validated(self) -> anyhow::Result<Self> {
        if self.day_of_week > 6 {
            return Err(BuddyError::invalid(Message::InvalidWeekday(self.day_of_week.to_string())));
        }
        let start = parse_time(&self.start_time)?;
        let end = parse_time(&self.end_time)?;
        if start >= end {
            return Err(BuddyError::invalid(Message::InvalidTimeRange(
                self.start_time.trim().to_string(),
                self.end_time.trim().to_string(),
            )));
        }

        Ok(Self {
            subject_id: self.subject_id,
            day_of_week: self.day_of_week,
            start_time: start.format("%H:%M").to_string(),
            end_time: end.format("%H:%M").to_string(),
            location: super::subject::non_empty(self.location),
        })
    }
}

/// Accepts `0`-`6`, full English names or three-letter abbreviations.
pub fn parse_weekday(input: &str) -> anyhow::Result<u8> {
    let value = input.trim().to_lowercase();
    if let Ok(index) = value.parse::<u8>() {
        if index <= 6 {
            return Ok(index);
        }
    }
    WEEKDAYS
        .iter()
        .position(|day| {
            let day = day.to_lowercase();
            value.len() >= 3 && day.starts_with(&value)
        })
        .map(|index| index as u8)
        .ok_or_else(|| BuddyError::invalid(Message::InvalidWeekday(input.trim().to_string())))
}

/// Out-of-range input clamps to Sunday rather than panicking.
pub fn weekday_name(day: u8) -> &'static str {
    WEEKDAYS[usize::from(day.min(6))]
}

/// Today's weekday index in local time.
pub fn today_index() -> u8 {
    Local::now().weekday().num_days_from_monday() as u8
}

/// Parses `H:MM` or `HH:MM` (24-hour).
pub fn parse_time(input: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|_| BuddyError::invalid(Message::InvalidTime(input.trim().to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("0").unwrap(), 0);
        assert_eq!(parse_weekday("6").unwrap(), 6);
        assert_eq!(parse_weekday("Tue").unwrap(), 1);
        assert_eq!(parse_weekday("wednesday").unwrap(), 2);
        assert!(parse_weekday("7").is_err());
        assert!(parse_weekday("mo").is_err());
        assert!(parse_weekday("funday").is_err());
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(0), "Monday");
        assert_eq!(weekday_name(6), "Sunday");
        assert!(today_index() <= 6);
    }

    #[test]
    fn test_validated_normalises_times() {
        let entry = NewTimetableEntry {
            subject_id: 1,
            day_of_week: 2,
            start_time: "9:00".into(),
            end_time: "10:30".into(),
            location: Some("".into()),
        }
        .validated()
        .unwrap();
        assert_eq!(entry.start_time, "09:00");
        assert_eq!(entry.end_time, "10:30");
        assert_eq!(entry.location, None);
    }

    #[test]
    fn test_validated_rejects_bad_ranges() {
        let entry = NewTimetableEntry {
            subject_id: 1,
            day_of_week: 2,
            start_time: "11:00".into(),
            end_time: "10:00".into(),
            location: None,
        };
        assert!(entry.clone().validated().is_err());
        assert!(NewTimetableEntry { end_time: "25:00".into(), ..entry.clone() }.validated().is_err());
        assert!(NewTimetableEntry { day_of_week: 7, ..entry }.validated().is_err());
    }
}
