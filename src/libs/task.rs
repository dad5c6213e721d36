use super::error::BuddyError;
use super::messages::Message;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Lenient parse: anything unrecognised becomes `Medium`.
    pub fn parse_lossy(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "low" | "l" => Priority::Low,
            "high" | "h" => Priority::High,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Done => "done",
        }
    }

    pub fn from_done(done: bool) -> Self {
        if done {
            TaskStatus::Done
        } else {
            TaskStatus::Todo
        }
    }
}

/// Which tasks a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    Todo,
    Done,
    All,
}

impl TaskFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFilter::Todo => "todo",
            TaskFilter::Done => "done",
            TaskFilter::All => "all",
        }
    }
}

impl FromStr for TaskFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "todo" | "open" => Ok(TaskFilter::Todo),
            "done" => Ok(TaskFilter::Done),
            "all" => Ok(TaskFilter::All),
            other => Err(BuddyError::invalid(Message::InvalidInput(format!("unknown task filter '{}'", other)))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: i64,
    pub subject_id: Option<i64>,
    pub subject_name: Option<String>,
    pub title: String,
    pub due_at: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub created_at: String,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub subject_id: Option<i64>,
    pub due_at: Option<String>,
    pub priority: Priority,
}

impl NewTask {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            subject_id: None,
            due_at: None,
            priority: Priority::default(),
        }
    }

    pub fn validated(self) -> anyhow::Result<Self> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(BuddyError::invalid(Message::TitleRequired));
        }
        let due_at = match super::subject::non_empty(self.due_at) {
            Some(due) => Some(normalize_due(&due)?),
            None => None,
        };

        Ok(Self {
            title,
            subject_id: self.subject_id,
            due_at,
            priority: self.priority,
        })
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD HH:MM` (the
/// format HTML `datetime-local` inputs send) and stores the `T` form.
pub fn normalize_due(input: &str) -> anyhow::Result<String> {
    let value = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.format("%Y-%m-%d").to_string());
    }
    for layout in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, layout) {
            return Ok(ts.format("%Y-%m-%dT%H:%M").to_string());
        }
    }
    Err(BuddyError::invalid(Message::InvalidDate(value.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_falls_back_to_medium() {
        assert_eq!(Priority::parse_lossy("HIGH"), Priority::High);
        assert_eq!(Priority::parse_lossy("low"), Priority::Low);
        assert_eq!(Priority::parse_lossy("urgent"), Priority::Medium);
        assert_eq!(Priority::parse_lossy(""), Priority::Medium);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("".parse::<TaskFilter>().unwrap(), TaskFilter::Todo);
        assert_eq!("All".parse::<TaskFilter>().unwrap(), TaskFilter::All);
        assert!("later".parse::<TaskFilter>().is_err());
    }

    #[test]
    fn test_normalize_due() {
        assert_eq!(normalize_due("2026-03-01").unwrap(), "2026-03-01");
        assert_eq!(normalize_due("2026-03-01 17:30").unwrap(), "2026-03-01T17:30");
        assert_eq!(normalize_due("2026-03-01T17:30").unwrap(), "2026-03-01T17:30");
        assert!(normalize_due("tomorrow").is_err());
    }

    #[test]
    fn test_validated() {
        assert!(NewTask::new("   ").validated().is_err());

        let mut task = NewTask::new(" Lab report ");
        task.due_at = Some("".into());
        let task = task.validated().unwrap();
        assert_eq!(task.title, "Lab report");
        assert_eq!(task.due_at, None);
    }
}
