use crate::libs::error::BuddyError;
use crate::libs::formatter::now_local;
use crate::libs::messages::Message;
use crate::libs::subject::{NewSubject, Subject};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_SUBJECT: &str = "
    INSERT INTO subjects (user_id, name, code, credits, target_attendance, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";
const SELECT_SUBJECTS: &str = "
    SELECT id, name, code, credits, target_attendance, created_at
    FROM subjects
    WHERE user_id = ?1
    ORDER BY name COLLATE NOCASE, id
";
const SELECT_SUBJECT: &str = "
    SELECT id, name, code, credits, target_attendance, created_at
    FROM subjects
    WHERE user_id = ?1 AND id = ?2
";
const UPDATE_SUBJECT: &str = "
    UPDATE subjects SET name = ?3, code = ?4, credits = ?5, target_attendance = ?6
    WHERE user_id = ?1 AND id = ?2
";
const DELETE_SUBJECT: &str = "DELETE FROM subjects WHERE user_id = ?1 AND id = ?2";
const SUBJECT_EXISTS: &str = "SELECT 1 FROM subjects WHERE user_id = ?1 AND id = ?2";

/// One user's subjects.
///
/// Deleting a subject removes its timetable entries and attendance records
/// and detaches (but keeps) its tasks and resources.
pub struct Subjects<'a> {
    conn: &'a Connection,
    user_id: i64,
}

impl<'a> Subjects<'a> {
    pub fn new(conn: &'a Connection, user_id: i64) -> Self {
        Self { conn, user_id }
    }

    pub fn create(&self, subject: NewSubject) -> Result<Subject> {
        let subject = subject.validated()?;
        self.conn.execute(
            INSERT_SUBJECT,
            params![
                self.user_id,
                subject.name,
                subject.code,
                subject.credits,
                subject.target_attendance,
                now_local()
            ],
        )?;
        self.get(self.conn.last_insert_rowid())
    }

    pub fn list(&self) -> Result<Vec<Subject>> {
        let mut stmt = self.conn.prepare(SELECT_SUBJECTS)?;
        let subjects = stmt
            .query_map(params![self.user_id], row_to_subject)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(subjects)
    }

    pub fn get(&self, id: i64) -> Result<Subject> {
        self.conn
            .query_row(SELECT_SUBJECT, params![self.user_id, id], row_to_subject)
            .optional()?
            .ok_or_else(|| BuddyError::not_found(Message::SubjectNotFound(id)))
    }

    pub fn update(&self, id: i64, subject: NewSubject) -> Result<Subject> {
        let subject = subject.validated()?;
        let affected = self.conn.execute(
            UPDATE_SUBJECT,
            params![
                self.user_id,
                id,
                subject.name,
                subject.code,
                subject.credits,
                subject.target_attendance
            ],
        )?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::SubjectNotFound(id)));
        }
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_SUBJECT, params![self.user_id, id])?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::SubjectNotFound(id)));
        }
        Ok(())
    }

    /// Fails with "not found" unless `id` is one of this user's subjects.
    pub fn ensure_owned(&self, id: i64) -> Result<()> {
        let exists = self
            .conn
            .query_row(SUBJECT_EXISTS, params![self.user_id, id], |_| Ok(()))
            .optional()?;
        exists.ok_or_else(|| BuddyError::not_found(Message::SubjectNotFound(id)))
    }
}

fn row_to_subject(row: &Row) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        credits: row.get(3)?,
        target_attendance: row.get(4)?,
        created_at: row.get(5)?,
    })
}
