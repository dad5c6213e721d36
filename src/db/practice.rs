use crate::libs::error::BuddyError;
use crate::libs::formatter::now_local;
use crate::libs::messages::Message;
use crate::libs::practice::{streak, NewPracticeEntry, PracticeEntry, PracticeStats, PracticeStatus};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const INSERT_ENTRY: &str = "
    INSERT INTO practice_logs (user_id, log_date, platform, problem, status, difficulty, topic, link, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
";
const SELECT_ENTRIES: &str = "
    SELECT id, log_date, platform, problem, status, difficulty, topic, link, created_at
    FROM practice_logs
    WHERE user_id = ?1
";
const ORDER_NEWEST: &str = "ORDER BY log_date DESC, id DESC";
const DELETE_ENTRY: &str = "DELETE FROM practice_logs WHERE user_id = ?1 AND id = ?2";
/// Platforms compare case-insensitively, as in `list`.
const COUNT_BY_PLATFORM: &str = "
    SELECT MIN(platform), COUNT(*) AS n
    FROM practice_logs
    WHERE user_id = ?1
    GROUP BY lower(platform)
    ORDER BY n DESC, lower(platform)
";
const SELECT_DATES: &str = "SELECT DISTINCT log_date FROM practice_logs WHERE user_id = ?1";

pub struct Practice<'a> {
    conn: &'a Connection,
    user_id: i64,
}

impl<'a> Practice<'a> {
    pub fn new(conn: &'a Connection, user_id: i64) -> Self {
        Self { conn, user_id }
    }

    pub fn add(&self, entry: NewPracticeEntry) -> Result<i64> {
        let entry = entry.validated()?;
        self.conn.execute(
            INSERT_ENTRY,
            params![
                self.user_id,
                entry.log_date.format("%Y-%m-%d").to_string(),
                entry.platform,
                entry.problem,
                entry.status.as_str(),
                entry.difficulty,
                entry.topic,
                entry.link,
                now_local()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Latest day first. `platform` matches case-insensitively.
    pub fn list(&self, platform: Option<&str>) -> Result<Vec<PracticeEntry>> {
        let entries = match platform.map(str::trim).filter(|p| !p.is_empty()) {
            Some(platform) => {
                let sql = format!("{} AND lower(platform) = lower(?2) {}", SELECT_ENTRIES, ORDER_NEWEST);
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![self.user_id, platform], row_to_entry)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("{} {}", SELECT_ENTRIES, ORDER_NEWEST);
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![self.user_id], row_to_entry)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(entries)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_ENTRY, params![self.user_id, id])?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::PracticeEntryNotFound(id)));
        }
        Ok(())
    }

    /// Totals, per-platform counts and the streak as of `today`.
    pub fn stats(&self, today: NaiveDate) -> Result<PracticeStats> {
        let mut stmt = self.conn.prepare(COUNT_BY_PLATFORM)?;
        let per_platform = stmt
            .query_map(params![self.user_id], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize)))?
            .collect::<Result<Vec<_>, _>>()?;
        let total = per_platform.iter().map(|(_, count)| count).sum();

        let mut stmt = self.conn.prepare(SELECT_DATES)?;
        let dates = stmt
            .query_map(params![self.user_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?
            .iter()
            .filter_map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .collect::<Vec<_>>();

        Ok(PracticeStats {
            total,
            per_platform,
            streak: streak(&dates, today),
        })
    }
}

fn row_to_entry(row: &Row) -> rusqlite::Result<PracticeEntry> {
    let status: String = row.get(4)?;
    Ok(PracticeEntry {
        id: row.get(0)?,
        log_date: row.get(1)?,
        platform: row.get(2)?,
        problem: row.get(3)?,
        status: status.parse().unwrap_or(PracticeStatus::Solved),
        difficulty: row.get(5)?,
        topic: row.get(6)?,
        link: row.get(7)?,
        created_at: row.get(8)?,
    })
}
