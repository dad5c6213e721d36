use super::error::BuddyError;
use super::messages::Message;
use serde::Serialize;

/// Default attendance target for a subject, in percent.
pub const DEFAULT_TARGET: f64 = 75.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub credits: i64,
    pub target_attendance: f64,
    pub created_at: String,
}

impl Subject {
    /// "CS201 Data Structures" when a code is set, the bare name otherwise.
    pub fn label(&self) -> String {
        match &self.code {
            Some(code) => format!("{} {}", code, self.name),
            None => self.name.clone(),
        }
    }
}

/// Input for creating or updating a subject.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubject {
    pub name: String,
    pub code: Option<String>,
    pub credits: i64,
    pub target_attendance: f64,
}

impl NewSubject {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            code: None,
            credits: 0,
            target_attendance: DEFAULT_TARGET,
        }
    }

    pub fn validated(self) -> anyhow::Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(BuddyError::invalid(Message::NameRequired));
        }
        if !(0.0..=100.0).contains(&self.target_attendance) {
            return Err(BuddyError::invalid(Message::InvalidTarget(self.target_attendance)));
        }
        if self.credits < 0 {
            return Err(BuddyError::invalid(Message::InvalidCredits(self.credits)));
        }

        Ok(Self {
            name,
            code: non_empty(self.code),
            credits: self.credits,
            target_attendance: self.target_attendance,
        })
    }
}

/// Trims optional text input, mapping blank to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
