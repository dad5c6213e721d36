//! Attendance records and the calculator that turns them into guidance.
//!
//! Percentages are never stored. They are recomputed from present/absent
//! counts whenever a summary is read, so editing or deleting a record is
//! always reflected immediately.
//!
//! ## Calculations
//!
//! With `p` presents, `a` absences, `n = p + a` and a target of `T` percent:
//!
//! - **percentage**: `100 * p / n`, or no value at all when `n == 0`
//! - **safe absences**: the largest `k` with `100 * p / (n + k) >= T`
//! - **classes needed**: the smallest `k` with `100 * (p + k) / (n + k) >= T`
//!
//! ```rust
//! use btech_buddy::libs::attendance::{AttendanceStats, AttendanceHealth};
//!
//! let stats = AttendanceStats::compute(6, 4, 75.0);
//! assert_eq!(stats.percentage, Some(60.0));
//! assert_eq!(stats.classes_needed, 6);
//! assert_eq!(stats.health, AttendanceHealth::AtRisk);
//! ```

use super::error::BuddyError;
use super::messages::Message;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Absorbs float noise before flooring/ceiling class counts.
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" | "p" => Ok(AttendanceStatus::Present),
            "absent" | "a" => Ok(AttendanceStatus::Absent),
            _ => Err(BuddyError::invalid(Message::InvalidAttendanceStatus(s.trim().to_string()))),
        }
    }
}

/// Percentage of classes attended, `None` when nothing is recorded.
pub fn percentage(present: u32, absent: u32) -> Option<f64> {
    let total = present + absent;
    if total == 0 {
        return None;
    }
    Some(100.0 * f64::from(present) / f64::from(total))
}

/// Where a subject stands against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceHealth {
    NoData,
    OnTrack,
    AtRisk,
}

impl AttendanceHealth {
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceHealth::NoData => "no data",
            AttendanceHealth::OnTrack => "on track",
            AttendanceHealth::AtRisk => "at risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceStats {
    pub present: u32,
    pub absent: u32,
    pub percentage: Option<f64>,
    pub target: f64,
    /// Classes that can still be missed while staying at or above target.
    pub safe_absences: u32,
    /// Consecutive presents needed to climb back to target.
    pub classes_needed: u32,
    pub health: AttendanceHealth,
}

impl AttendanceStats {
    pub fn compute(present: u32, absent: u32, target: f64) -> Self {
        let percentage = percentage(present, absent);
        let total = f64::from(present + absent);
        let p = f64::from(present);
        let meaningful_target = target > 0.0 && target < 100.0;

        let (health, safe_absences, classes_needed) = match percentage {
            None => (AttendanceHealth::NoData, 0, 0),
            Some(pct) if pct + EPSILON >= target => {
                let safe = if meaningful_target {
                    ((100.0 * p / target - total) + EPSILON).floor().max(0.0) as u32
                } else {
                    0
                };
                (AttendanceHealth::OnTrack, safe, 0)
            }
            Some(_) => {
                let needed = if meaningful_target {
                    ((target * total - 100.0 * p) / (100.0 - target) - EPSILON).ceil().max(0.0) as u32
                } else {
                    0
                };
                (AttendanceHealth::AtRisk, 0, needed)
            }
        };

        Self {
            present,
            absent,
            percentage,
            target,
            safe_absences,
            classes_needed,
            health,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.absent
    }

    /// One-line advice, e.g. "can miss 2 more" or "attend next 3".
    pub fn guidance(&self) -> String {
        match self.health {
            AttendanceHealth::NoData => Message::AttendanceNoData.to_string(),
            AttendanceHealth::OnTrack => format!("can miss {} more", self.safe_absences),
            AttendanceHealth::AtRisk => format!("attend next {}", self.classes_needed),
        }
    }
}

/// A single marked class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub subject_id: i64,
    pub subject_name: String,
    pub class_date: String,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub subject_id: i64,
    pub class_date: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// Per-subject totals, as shown on the attendance page and dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectAttendance {
    pub subject_id: i64,
    pub subject_name: String,
    pub code: Option<String>,
    #[serde(flatten)]
    pub stats: AttendanceStats,
}

impl SubjectAttendance {
    pub fn new(subject_id: i64, subject_name: String, code: Option<String>, present: u32, absent: u32, target: f64) -> Self {
        Self {
            subject_id,
            subject_name,
            code,
            stats: AttendanceStats::compute(present, absent, target),
        }
    }
}

/// Parses `YYYY-MM-DD`; `today` and an empty string mean the local date.
pub fn parse_date(input: &str) -> anyhow::Result<NaiveDate> {
    let value = input.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| BuddyError::invalid(Message::InvalidDate(value.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(8, 2), Some(80.0));
        assert_eq!(percentage(0, 5), Some(0.0));
        assert_eq!(percentage(3, 0), Some(100.0));
        assert_eq!(percentage(0, 0), None);
    }

    #[test]
    fn test_percentage_matches_formula() {
        for present in 0..20u32 {
            for absent in 0..20u32 {
                let expected = if present + absent == 0 {
                    None
                } else {
                    Some(100.0 * present as f64 / (present + absent) as f64)
                };
                assert_eq!(percentage(present, absent), expected);
            }
        }
    }

    #[test]
    fn test_no_data() {
        let stats = AttendanceStats::compute(0, 0, 75.0);
        assert_eq!(stats.health, AttendanceHealth::NoData);
        assert_eq!(stats.percentage, None);
        assert_eq!(stats.safe_absences, 0);
        assert_eq!(stats.classes_needed, 0);
        assert_eq!(stats.guidance(), "no data");
    }

    #[test]
    fn test_safe_absences() {
        // 9/10 = 90%; 9/12 = 75% is the last safe point.
        let stats = AttendanceStats::compute(9, 1, 75.0);
        assert_eq!(stats.health, AttendanceHealth::OnTrack);
        assert_eq!(stats.safe_absences, 2);
        assert_eq!(stats.classes_needed, 0);

        // Exactly at target: nothing to spare.
        let stats = AttendanceStats::compute(3, 1, 75.0);
        assert_eq!(stats.health, AttendanceHealth::OnTrack);
        assert_eq!(stats.safe_absences, 0);

        // 4/5 = 80% with an 80% target.
        let stats = AttendanceStats::compute(4, 1, 80.0);
        assert_eq!(stats.safe_absences, 0);
    }

    #[test]
    fn test_classes_needed() {
        // 1/4 = 25%; 9/12 = 75%.
        let stats = AttendanceStats::compute(1, 3, 75.0);
        assert_eq!(stats.health, AttendanceHealth::AtRisk);
        assert_eq!(stats.classes_needed, 8);
        assert_eq!(stats.guidance(), "attend next 8");

        // 6/10 = 60%; 12/16 = 75%.
        assert_eq!(AttendanceStats::compute(6, 4, 75.0).classes_needed, 6);
    }

    #[test]
    fn test_degenerate_targets() {
        let stats = AttendanceStats::compute(5, 5, 0.0);
        assert_eq!(stats.health, AttendanceHealth::OnTrack);
        assert_eq!(stats.safe_absences, 0);

        let stats = AttendanceStats::compute(5, 5, 100.0);
        assert_eq!(stats.health, AttendanceHealth::AtRisk);
        assert_eq!(stats.classes_needed, 0);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Present".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Present);
        assert_eq!("a".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Absent);
        assert!("late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-02-03").unwrap(), NaiveDate::from_ymd_opt(2026, 2, 3).unwrap());
        assert_eq!(parse_date("today").unwrap(), Local::now().date_naive());
        assert!(parse_date("03/02/2026").is_err());
        assert!(parse_date("2026-02-30").is_err());
    }
}
