use super::subjects::Subjects;
use crate::libs::error::BuddyError;
use crate::libs::formatter::now_local;
use crate::libs::messages::Message;
use crate::libs::timetable::{NewTimetableEntry, TimetableEntry};
use anyhow::Result;
use rusqlite::{params, Connection, Row};

const INSERT_ENTRY: &str = "
    INSERT INTO timetable_entries (user_id, subject_id, day_of_week, start_time, end_time, location, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
";
const SELECT_ENTRIES: &str = "
    SELECT t.id, t.subject_id, s.name, t.day_of_week, t.start_time, t.end_time, t.location
    FROM timetable_entries t
    JOIN subjects s ON s.id = t.subject_id
    WHERE t.user_id = ?1
";
const UPDATE_ENTRY: &str = "
    UPDATE timetable_entries
    SET subject_id = ?3, day_of_week = ?4, start_time = ?5, end_time = ?6, location = ?7
    WHERE user_id = ?1 AND id = ?2
";
const DELETE_ENTRY: &str = "DELETE FROM timetable_entries WHERE user_id = ?1 AND id = ?2";

pub struct Timetable<'a> {
    conn: &'a Connection,
    user_id: i64,
}

impl<'a> Timetable<'a> {
    pub fn new(conn: &'a Connection, user_id: i64) -> Self {
        Self { conn, user_id }
    }

    pub fn add(&self, entry: NewTimetableEntry) -> Result<i64> {
        let entry = entry.validated()?;
        Subjects::new(self.conn, self.user_id).ensure_owned(entry.subject_id)?;

        self.conn.execute(
            INSERT_ENTRY,
            params![
                self.user_id,
                entry.subject_id,
                entry.day_of_week,
                entry.start_time,
                entry.end_time,
                entry.location,
                now_local()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Classes on one weekday, earliest first.
    pub fn for_day(&self, day: u8) -> Result<Vec<TimetableEntry>> {
        let sql = format!("{} AND t.day_of_week = ?2 ORDER BY t.start_time, t.id", SELECT_ENTRIES);
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![self.user_id, day], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// The whole week, Monday first.
    pub fn week(&self) -> Result<Vec<TimetableEntry>> {
        let sql = format!("{} ORDER BY t.day_of_week, t.start_time, t.id", SELECT_ENTRIES);
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![self.user_id], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn update(&self, id: i64, entry: NewTimetableEntry) -> Result<()> {
        let entry = entry.validated()?;
        Subjects::new(self.conn, self.user_id).ensure_owned(entry.subject_id)?;

        let affected = self.conn.execute(
            UPDATE_ENTRY,
            params![
                self.user_id,
                id,
                entry.subject_id,
                entry.day_of_week,
                entry.start_time,
                entry.end_time,
                entry.location
            ],
        )?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::TimetableEntryNotFound(id)));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_ENTRY, params![self.user_id, id])?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::TimetableEntryNotFound(id)));
        }
        Ok(())
    }
}

fn row_to_entry(row: &Row) -> rusqlite::Result<TimetableEntry> {
    Ok(TimetableEntry {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        subject_name: row.get(2)?,
        day_of_week: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        location: row.get(6)?,
    })
}
