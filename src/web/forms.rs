//! Form bodies posted by the pages.
//!
//! Every field is optional text so that a missing or blank field reaches
//! validation (and a 400 re-render) instead of failing deserialisation.

use crate::libs::attendance::{parse_date, AttendanceStatus, NewAttendance};
use crate::libs::error::BuddyError;
use crate::libs::messages::Message;
use crate::libs::practice::NewPracticeEntry;
use crate::libs::resource::NewResource;
use crate::libs::subject::NewSubject;
use crate::libs::task::{NewTask, Priority};
use crate::libs::timetable::{parse_weekday, NewTimetableEntry};
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubjectForm {
    pub subject_id: String,
    pub name: String,
    pub code: String,
    pub credits: String,
    pub target_attendance: String,
}

impl SubjectForm {
    pub fn to_new_subject(&self, default_target: f64) -> Result<NewSubject> {
        Ok(NewSubject {
            name: self.name.clone(),
            code: Some(self.code.clone()),
            credits: parse_or(&self.credits, 0, "credits")?,
            target_attendance: parse_or(&self.target_attendance, default_target, "target attendance")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TimetableForm {
    pub subject_id: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

impl TimetableForm {
    pub fn to_new_entry(&self) -> Result<NewTimetableEntry> {
        Ok(NewTimetableEntry {
            subject_id: parse_id(&self.subject_id, "subject")?,
            day_of_week: parse_weekday(&self.day_of_week)?,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            location: Some(self.location.clone()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttendanceForm {
    pub subject_id: String,
    pub class_date: String,
    pub status: String,
    pub note: String,
}

impl AttendanceForm {
    pub fn to_new_attendance(&self) -> Result<NewAttendance> {
        Ok(NewAttendance {
            subject_id: parse_id(&self.subject_id, "subject")?,
            class_date: parse_date(&self.class_date)?,
            status: self.status.parse::<AttendanceStatus>()?,
            note: Some(self.note.clone()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub title: String,
    pub subject_id: String,
    pub due_at: String,
    pub priority: String,
}

impl TaskForm {
    pub fn to_new_task(&self) -> Result<NewTask> {
        Ok(NewTask {
            title: self.title.clone(),
            subject_id: parse_optional_id(&self.subject_id, "subject")?,
            due_at: Some(self.due_at.clone()),
            priority: Priority::parse_lossy(&self.priority),
        })
    }
}

/// Toggle or explicitly set a task's status. Without `next_status` the
/// current status is flipped.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskStatusForm {
    pub task_id: String,
    pub next_status: String,
    pub show: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResourceForm {
    pub title: String,
    pub url: String,
    pub subject_id: String,
    pub tags: String,
}

impl ResourceForm {
    pub fn to_new_resource(&self) -> Result<NewResource> {
        let mut resource = NewResource::new(&self.title, &self.url).with_tags(&self.tags);
        resource.subject_id = parse_optional_id(&self.subject_id, "subject")?;
        Ok(resource)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PracticeForm {
    pub log_date: String,
    pub platform: String,
    pub problem: String,
    pub status: String,
    pub difficulty: String,
    pub topic: String,
    pub link: String,
}

impl PracticeForm {
    pub fn to_new_entry(&self) -> Result<NewPracticeEntry> {
        let mut entry = NewPracticeEntry::new(parse_date(&self.log_date)?, &self.platform, &self.problem);
        entry.status = self.status.parse()?;
        entry.difficulty = Some(self.difficulty.clone());
        entry.topic = Some(self.topic.clone());
        entry.link = Some(self.link.clone());
        Ok(entry)
    }
}

/// Delete forms carry a single id under varying names.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    #[serde(alias = "subject_id", alias = "entry_id", alias = "record_id", alias = "task_id", alias = "resource_id", alias = "log_id")]
    pub id: String,
    /// The listing to return to, as the page's own query value.
    pub back: String,
}

pub fn parse_id(value: &str, field: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| BuddyError::invalid(Message::InvalidInput(format!("{} must be chosen", field))))
}

/// Blank means "none".
pub fn parse_optional_id(value: &str, field: &str) -> Result<Option<i64>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_id(value, field).map(Some)
}

fn parse_or<T: std::str::FromStr>(value: &str, default: T, field: &str) -> Result<T> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(default);
    }
    value
        .parse()
        .map_err(|_| BuddyError::invalid(Message::InvalidInput(format!("{} must be a number, got '{}'", field, value))))
}
