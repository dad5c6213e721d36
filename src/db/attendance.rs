use super::subjects::Subjects;
use crate::libs::attendance::{AttendanceRecord, AttendanceStatus, NewAttendance, SubjectAttendance};
use crate::libs::error::BuddyError;
use crate::libs::formatter::now_local;
use crate::libs::messages::Message;
use crate::libs::subject::non_empty;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// One record per user, subject and day: marking again overwrites.
const UPSERT_RECORD: &str = "
    INSERT INTO attendance_records (user_id, subject_id, class_date, status, note, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT (user_id, subject_id, class_date)
    DO UPDATE SET status = excluded.status, note = excluded.note
";
const SELECT_RECORDS: &str = "
    SELECT a.id, a.subject_id, s.name, a.class_date, a.status, a.note, a.created_at
    FROM attendance_records a
    JOIN subjects s ON s.id = a.subject_id
    WHERE a.user_id = ?1
";
const SELECT_SUMMARY: &str = "
    SELECT s.id, s.name, s.code, s.target_attendance,
           COALESCE(SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END), 0),
           COALESCE(SUM(CASE WHEN a.status = 'absent' THEN 1 ELSE 0 END), 0)
    FROM subjects s
    LEFT JOIN attendance_records a ON a.subject_id = s.id
    WHERE s.user_id = ?1
";
const DELETE_RECORD: &str = "DELETE FROM attendance_records WHERE user_id = ?1 AND id = ?2";

pub struct Attendance<'a> {
    conn: &'a Connection,
    user_id: i64,
}

impl<'a> Attendance<'a> {
    pub fn new(conn: &'a Connection, user_id: i64) -> Self {
        Self { conn, user_id }
    }

    /// Records presence or absence for a class, replacing any earlier mark
    /// for the same subject and day.
    pub fn mark(&self, record: NewAttendance) -> Result<AttendanceRecord> {
        Subjects::new(self.conn, self.user_id).ensure_owned(record.subject_id)?;
        let class_date = record.class_date.format("%Y-%m-%d").to_string();

        self.conn.execute(
            UPSERT_RECORD,
            params![
                self.user_id,
                record.subject_id,
                class_date,
                record.status.as_str(),
                non_empty(record.note),
                now_local()
            ],
        )?;

        let sql = format!("{} AND a.subject_id = ?2 AND a.class_date = ?3", SELECT_RECORDS);
        let marked = self
            .conn
            .query_row(&sql, params![self.user_id, record.subject_id, class_date], row_to_record)?;
        Ok(marked)
    }

    /// Most recent classes first.
    pub fn recent(&self, limit: usize) -> Result<Vec<AttendanceRecord>> {
        let sql = format!("{} ORDER BY a.class_date DESC, a.id DESC LIMIT ?2", SELECT_RECORDS);
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![self.user_id, limit as i64], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn for_subject(&self, subject_id: i64) -> Result<Vec<AttendanceRecord>> {
        Subjects::new(self.conn, self.user_id).ensure_owned(subject_id)?;
        let sql = format!("{} AND a.subject_id = ?2 ORDER BY a.class_date DESC, a.id DESC", SELECT_RECORDS);
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![self.user_id, subject_id], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_RECORD, params![self.user_id, id])?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::AttendanceRecordNotFound(id)));
        }
        Ok(())
    }

    /// Present/absent totals for every subject, including those with no
    /// records yet.
    pub fn summary(&self) -> Result<Vec<SubjectAttendance>> {
        let sql = format!("{} GROUP BY s.id ORDER BY s.name COLLATE NOCASE, s.id", SELECT_SUMMARY);
        let mut stmt = self.conn.prepare(&sql)?;
        let summary = stmt
            .query_map(params![self.user_id], row_to_summary)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summary)
    }

    pub fn subject_summary(&self, subject_id: i64) -> Result<SubjectAttendance> {
        let sql = format!("{} AND s.id = ?2 GROUP BY s.id", SELECT_SUMMARY);
        self.conn
            .query_row(&sql, params![self.user_id, subject_id], row_to_summary)
            .optional()?
            .ok_or_else(|| BuddyError::not_found(Message::SubjectNotFound(subject_id)))
    }
}

fn row_to_record(row: &Row) -> rusqlite::Result<AttendanceRecord> {
    let status: String = row.get(4)?;
    Ok(AttendanceRecord {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        subject_name: row.get(2)?,
        class_date: row.get(3)?,
        status: if status == "present" {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Absent
        },
        note: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn row_to_summary(row: &Row) -> rusqlite::Result<SubjectAttendance> {
    Ok(SubjectAttendance::new(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(4)?,
        row.get(5)?,
        row.get(3)?,
    ))
}
