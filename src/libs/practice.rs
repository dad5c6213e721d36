//! Coding practice log entries and streak statistics.

use super::error::BuddyError;
use super::messages::Message;
use super::resource::is_web_url;
use super::subject::non_empty;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PracticeStatus {
    #[default]
    Solved,
    Attempted,
    Revisit,
}

impl PracticeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PracticeStatus::Solved => "solved",
            PracticeStatus::Attempted => "attempted",
            PracticeStatus::Revisit => "revisit",
        }
    }
}

impl fmt::Display for PracticeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PracticeStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "solved" => Ok(PracticeStatus::Solved),
            "attempted" => Ok(PracticeStatus::Attempted),
            "revisit" => Ok(PracticeStatus::Revisit),
            _ => Err(BuddyError::invalid(Message::InvalidPracticeStatus(s.trim().to_string()))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeEntry {
    pub id: i64,
    pub log_date: String,
    pub platform: String,
    pub problem: String,
    pub status: PracticeStatus,
    pub difficulty: Option<String>,
    pub topic: Option<String>,
    pub link: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPracticeEntry {
    pub log_date: NaiveDate,
    pub platform: String,
    pub problem: String,
    pub status: PracticeStatus,
    pub difficulty: Option<String>,
    pub topic: Option<String>,
    pub link: Option<String>,
}

impl NewPracticeEntry {
    pub fn new(log_date: NaiveDate, platform: &str, problem: &str) -> Self {
        Self {
            log_date,
            platform: platform.to_string(),
            problem: problem.to_string(),
            status: PracticeStatus::default(),
            difficulty: None,
            topic: None,
            link: None,
        }
    }

    pub fn validated(self) -> anyhow::Result<Self> {
        let platform = self.platform.trim().to_string();
        if platform.is_empty() {
            return Err(BuddyError::invalid(Message::PlatformRequired));
        }
        let problem = self.problem.trim().to_string();
        if problem.is_empty() {
            return Err(BuddyError::invalid(Message::ProblemRequired));
        }

        let link = non_empty(self.link);
        if let Some(link) = &link {
            if !is_web_url(link) {
                return Err(BuddyError::invalid(Message::InvalidUrl(link.clone())));
            }
        }

        Ok(Self {
            log_date: self.log_date,
            platform,
            problem,
            status: self.status,
            difficulty: non_empty(self.difficulty),
            topic: non_empty(self.topic),
            link,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeStats {
    pub total: usize,
    /// `(platform, count)`, most used first.
    pub per_platform: Vec<(String, usize)>,
    pub streak: usize,
}

/// Consecutive days with at least one entry, ending today. A streak that
/// ended yesterday still counts, since today is not over yet.
pub fn streak(dates: &[NaiveDate], today: NaiveDate) -> usize {
    let days: BTreeSet<NaiveDate> = dates.iter().copied().collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut count = 0;
    while days.contains(&cursor) {
        count += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    count
}
