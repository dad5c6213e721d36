use super::subjects::Subjects;
use crate::libs::error::BuddyError;
use crate::libs::formatter::now_local;
use crate::libs::messages::Message;
use crate::libs::task::{NewTask, Priority, Task, TaskFilter, TaskStatus};
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_TASK: &str = "
    INSERT INTO tasks (user_id, subject_id, title, due_at, priority, status, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, 'todo', ?6)
";
const SELECT_TASKS: &str = "
    SELECT t.id, t.subject_id, s.name, t.title, t.due_at, t.priority, t.status, t.created_at
    FROM tasks t
    LEFT JOIN subjects s ON s.id = t.subject_id
    WHERE t.user_id = ?1
";
const PRIORITY_RANK: &str = "CASE t.priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END";
const UPDATE_TASK: &str = "
    UPDATE tasks SET subject_id = ?3, title = ?4, due_at = ?5, priority = ?6
    WHERE user_id = ?1 AND id = ?2
";
const SET_STATUS: &str = "UPDATE tasks SET status = ?3 WHERE user_id = ?1 AND id = ?2";
const TOGGLE_STATUS: &str = "
    UPDATE tasks SET status = CASE status WHEN 'done' THEN 'todo' ELSE 'done' END
    WHERE user_id = ?1 AND id = ?2
";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE user_id = ?1 AND id = ?2";

pub struct Tasks<'a> {
    conn: &'a Connection,
    user_id: i64,
}

impl<'a> Tasks<'a> {
    pub fn new(conn: &'a Connection, user_id: i64) -> Self {
        Self { conn, user_id }
    }

    pub fn insert(&self, task: NewTask) -> Result<Task> {
        let task = task.validated()?;
        if let Some(subject_id) = task.subject_id {
            Subjects::new(self.conn, self.user_id).ensure_owned(subject_id)?;
        }

        self.conn.execute(
            INSERT_TASK,
            params![
                self.user_id,
                task.subject_id,
                task.title,
                task.due_at,
                task.priority.as_str(),
                now_local()
            ],
        )?;
        self.get(self.conn.last_insert_rowid())
    }

    /// Open tasks first, then by due date (undated last) and priority.
    pub fn fetch(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        let condition = match filter {
            TaskFilter::Todo => "AND t.status = 'todo'",
            TaskFilter::Done => "AND t.status = 'done'",
            TaskFilter::All => "",
        };
        let sql = format!(
            "{} {} ORDER BY t.status = 'done', t.due_at IS NULL, t.due_at, {}, t.id",
            SELECT_TASKS, condition, PRIORITY_RANK
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt.query_map(params![self.user_id], row_to_task)?.collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Open tasks due within `days` of `today` (overdue included) plus
    /// undated ones: highest priority first, dated before undated, earliest
    /// due first.
    pub fn upcoming(&self, today: NaiveDate, days: i64, limit: usize) -> Result<Vec<Task>> {
        let horizon = (today + Duration::days(days)).format("%Y-%m-%d").to_string();
        let sql = format!(
            "{} AND t.status = 'todo' AND (t.due_at IS NULL OR substr(t.due_at, 1, 10) <= ?2)
             ORDER BY {}, t.due_at IS NULL, t.due_at, t.id
             LIMIT ?3",
            SELECT_TASKS, PRIORITY_RANK
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params![self.user_id, horizon, limit as i64], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn get(&self, id: i64) -> Result<Task> {
        let sql = format!("{} AND t.id = ?2", SELECT_TASKS);
        self.conn
            .query_row(&sql, params![self.user_id, id], row_to_task)
            .optional()?
            .ok_or_else(|| BuddyError::not_found(Message::TaskNotFound(id)))
    }

    pub fn update(&self, id: i64, task: NewTask) -> Result<Task> {
        let task = task.validated()?;
        if let Some(subject_id) = task.subject_id {
            Subjects::new(self.conn, self.user_id).ensure_owned(subject_id)?;
        }

        let affected = self.conn.execute(
            UPDATE_TASK,
            params![
                self.user_id,
                id,
                task.subject_id,
                task.title,
                task.due_at,
                task.priority.as_str()
            ],
        )?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::TaskNotFound(id)));
        }
        self.get(id)
    }

    /// Sets the done flag. Setting the current value again is a no-op.
    pub fn set_done(&self, id: i64, done: bool) -> Result<()> {
        let status = TaskStatus::from_done(done);
        let affected = self.conn.execute(SET_STATUS, params![self.user_id, id, status.as_str()])?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::TaskNotFound(id)));
        }
        Ok(())
    }

    /// Flips the done flag and returns the new status.
    pub fn toggle(&self, id: i64) -> Result<TaskStatus> {
        let affected = self.conn.execute(TOGGLE_STATUS, params![self.user_id, id])?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::TaskNotFound(id)));
        }
        Ok(self.get(id)?.status)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_TASK, params![self.user_id, id])?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::TaskNotFound(id)));
        }
        Ok(())
    }
}

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let priority: String = row.get(5)?;
    let status: String = row.get(6)?;
    Ok(Task {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        subject_name: row.get(2)?,
        title: row.get(3)?,
        due_at: row.get(4)?,
        priority: Priority::parse_lossy(&priority),
        status: TaskStatus::from_done(status == "done"),
        created_at: row.get(7)?,
    })
}
