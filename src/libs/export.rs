//! Data export for backup and spreadsheet analysis.
//!
//! Writes one user's tasks, attendance records or practice log to a file.
//!
//! ## Formats
//!
//! - **CSV**: one table per file, with a header row
//! - **JSON**: pretty-printed; `all` bundles every data set plus the
//!   per-subject attendance summary into one document
//!
//! ## Usage
//!
//! ```rust,no_run
//! use btech_buddy::db::db::Db;
//! use btech_buddy::libs::export::{ExportData, ExportFormat, Exporter};
//!
//! let db = Db::open("buddy.db")?;
//! let exporter = Exporter::new(ExportFormat::Json, ExportData::All, None);
//! exporter.export(&db.conn, 1)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::{attendance::Attendance, practice::Practice, tasks::Tasks};
use crate::libs::{attendance::SubjectAttendance, formatter::format_percentage, messages::Message, task::TaskFilter};
use crate::{msg_bail_anyhow, msg_success};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Upper bound on attendance rows pulled for an export.
const ATTENDANCE_EXPORT_LIMIT: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportData {
    /// Every task, open and done
    Tasks,
    /// Every marked class
    Attendance,
    /// The coding practice log
    Practice,
    /// All of the above plus the attendance summary (JSON only)
    All,
}

impl ExportData {
    fn name(&self) -> &'static str {
        match self {
            ExportData::Tasks => "tasks",
            ExportData::Attendance => "attendance",
            ExportData::Practice => "practice",
            ExportData::All => "all",
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportAll {
    exported_at: String,
    tasks: Vec<crate::libs::task::Task>,
    attendance: Vec<crate::libs::attendance::AttendanceRecord>,
    attendance_summary: Vec<SubjectAttendance>,
    practice: Vec<crate::libs::practice::PracticeEntry>,
}

pub struct Exporter {
    format: ExportFormat,
    data: ExportData,
    output_path: PathBuf,
}

impl Exporter {
    /// Without an explicit path the file lands in the working directory as
    /// `buddy_<data>_<YYYYMMDD_HHMMSS>.<ext>`.
    pub fn new(format: ExportFormat, data: ExportData, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "buddy_{}_{}.{}",
                data.name(),
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });

        Self {
            format,
            data,
            output_path,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn export(&self, conn: &Connection, user_id: i64) -> Result<()> {
        match (self.format, self.data) {
            (ExportFormat::Csv, ExportData::All) => msg_bail_anyhow!(Message::ExportCsvNeedsSingleSet),
            (ExportFormat::Csv, ExportData::Tasks) => self.tasks_csv(conn, user_id)?,
            (ExportFormat::Csv, ExportData::Attendance) => self.attendance_csv(conn, user_id)?,
            (ExportFormat::Csv, ExportData::Practice) => self.practice_csv(conn, user_id)?,
            (ExportFormat::Json, ExportData::Tasks) => self.write_json(&Tasks::new(conn, user_id).fetch(TaskFilter::All)?)?,
            (ExportFormat::Json, ExportData::Attendance) => {
                self.write_json(&Attendance::new(conn, user_id).recent(ATTENDANCE_EXPORT_LIMIT)?)?
            }
            (ExportFormat::Json, ExportData::Practice) => self.write_json(&Practice::new(conn, user_id).list(None)?)?,
            (ExportFormat::Json, ExportData::All) => {
                let attendance = Attendance::new(conn, user_id);
                self.write_json(&ExportAll {
                    exported_at: crate::libs::formatter::now_local(),
                    tasks: Tasks::new(conn, user_id).fetch(TaskFilter::All)?,
                    attendance: attendance.recent(ATTENDANCE_EXPORT_LIMIT)?,
                    attendance_summary: attendance.summary()?,
                    practice: Practice::new(conn, user_id).list(None)?,
                })?
            }
        }

        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        File::create(&self.output_path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn tasks_csv(&self, conn: &Connection, user_id: i64) -> Result<()> {
        let tasks = Tasks::new(conn, user_id).fetch(TaskFilter::All)?;
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(["ID", "Title", "Subject", "Due", "Priority", "Status", "Created"])?;

        for task in tasks {
            wtr.write_record([
                task.id.to_string(),
                task.title,
                task.subject_name.unwrap_or_default(),
                task.due_at.unwrap_or_default(),
                task.priority.to_string(),
                task.status.as_str().to_string(),
                task.created_at,
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn attendance_csv(&self, conn: &Connection, user_id: i64) -> Result<()> {
        let repo = Attendance::new(conn, user_id);
        let records = repo.recent(ATTENDANCE_EXPORT_LIMIT)?;
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(["ID", "Date", "Subject", "Status", "Note"])?;

        for record in records {
            wtr.write_record([
                record.id.to_string(),
                record.class_date,
                record.subject_name,
                record.status.to_string(),
                record.note.unwrap_or_default(),
            ])?;
        }

        // Totals go after a blank separator so the file still opens as one sheet.
        wtr.write_record(["", "", "", "", ""])?;
        wtr.write_record(["Subject", "Present", "Absent", "Percentage", "Target"])?;
        for subject in repo.summary()? {
            wtr.write_record([
                subject.subject_name,
                subject.stats.present.to_string(),
                subject.stats.absent.to_string(),
                format_percentage(subject.stats.percentage),
                format!("{:.0}%", subject.stats.target),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn practice_csv(&self, conn: &Connection, user_id: i64) -> Result<()> {
        let entries = Practice::new(conn, user_id).list(None)?;
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(["ID", "Date", "Platform", "Problem", "Status", "Difficulty", "Topic", "Link"])?;

        for entry in entries {
            wtr.write_record([
                entry.id.to_string(),
                entry.log_date,
                entry.platform,
                entry.problem,
                entry.status.to_string(),
                entry.difficulty.unwrap_or_default(),
                entry.topic.unwrap_or_default(),
                entry.link.unwrap_or_default(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
