use super::subjects::Subjects;
use crate::libs::error::BuddyError;
use crate::libs::formatter::now_local;
use crate::libs::messages::Message;
use crate::libs::resource::{normalize_tag, NewResource, Resource};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_RESOURCE: &str = "
    INSERT INTO resources (user_id, subject_id, title, url, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
";
const SELECT_RESOURCES: &str = "
    SELECT r.id, r.subject_id, s.name, r.title, r.url, r.created_at
    FROM resources r
    LEFT JOIN subjects s ON s.id = r.subject_id
    WHERE r.user_id = ?1
";
const ORDER_NEWEST: &str = "ORDER BY r.created_at DESC, r.id DESC";
const UPDATE_RESOURCE: &str = "
    UPDATE resources SET subject_id = ?3, title = ?4, url = ?5
    WHERE user_id = ?1 AND id = ?2
";
const DELETE_RESOURCE: &str = "DELETE FROM resources WHERE user_id = ?1 AND id = ?2";
const INSERT_TAG: &str = "INSERT OR IGNORE INTO resource_tags (resource_id, tag) VALUES (?1, ?2)";
const DELETE_TAGS: &str = "DELETE FROM resource_tags WHERE resource_id = ?1";
const SELECT_TAGS_BY_RESOURCE: &str = "SELECT tag FROM resource_tags WHERE resource_id = ?1 ORDER BY tag";
const SELECT_TAG_COUNTS: &str = "
    SELECT rt.tag, COUNT(*)
    FROM resource_tags rt
    JOIN resources r ON r.id = rt.resource_id
    WHERE r.user_id = ?1
    GROUP BY rt.tag
    ORDER BY rt.tag
";

/// Saved links with free-form tags.
pub struct Resources<'a> {
    conn: &'a Connection,
    user_id: i64,
}

impl<'a> Resources<'a> {
    pub fn new(conn: &'a Connection, user_id: i64) -> Self {
        Self { conn, user_id }
    }

    pub fn add(&self, resource: NewResource) -> Result<Resource> {
        let resource = resource.validated()?;
        if let Some(subject_id) = resource.subject_id {
            Subjects::new(self.conn, self.user_id).ensure_owned(subject_id)?;
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            INSERT_RESOURCE,
            params![self.user_id, resource.subject_id, resource.title, resource.url, now_local()],
        )?;
        let id = tx.last_insert_rowid();
        for tag in &resource.tags {
            tx.execute(INSERT_TAG, params![id, tag])?;
        }
        tx.commit()?;

        self.get(id)
    }

    /// Newest first.
    pub fn list(&self) -> Result<Vec<Resource>> {
        let sql = format!("{} {}", SELECT_RESOURCES, ORDER_NEWEST);
        self.query(&sql, params![self.user_id])
    }

    /// Resources carrying exactly `tag`, compared case-insensitively.
    pub fn with_tag(&self, tag: &str) -> Result<Vec<Resource>> {
        let sql = format!(
            "{} AND EXISTS (SELECT 1 FROM resource_tags rt WHERE rt.resource_id = r.id AND rt.tag = ?2) {}",
            SELECT_RESOURCES, ORDER_NEWEST
        );
        self.query(&sql, params![self.user_id, normalize_tag(tag)])
    }

    /// Every tag in use, with how many resources carry it.
    pub fn tags(&self) -> Result<Vec<(String, usize)>> {
        let mut stmt = self.conn.prepare(SELECT_TAG_COUNTS)?;
        let tags = stmt
            .query_map(params![self.user_id], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? as usize)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    pub fn get(&self, id: i64) -> Result<Resource> {
        let sql = format!("{} AND r.id = ?2", SELECT_RESOURCES);
        let resource = self
            .conn
            .query_row(&sql, params![self.user_id, id], row_to_resource)
            .optional()?
            .ok_or_else(|| BuddyError::not_found(Message::ResourceNotFound(id)))?;
        self.with_tags_loaded(resource)
    }

    /// Replaces title, link, subject and the whole tag set.
    pub fn update(&self, id: i64, resource: NewResource) -> Result<Resource> {
        let resource = resource.validated()?;
        if let Some(subject_id) = resource.subject_id {
            Subjects::new(self.conn, self.user_id).ensure_owned(subject_id)?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let affected = tx.execute(
            UPDATE_RESOURCE,
            params![self.user_id, id, resource.subject_id, resource.title, resource.url],
        )?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::ResourceNotFound(id)));
        }
        tx.execute(DELETE_TAGS, params![id])?;
        for tag in &resource.tags {
            tx.execute(INSERT_TAG, params![id, tag])?;
        }
        tx.commit()?;

        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_RESOURCE, params![self.user_id, id])?;
        if affected == 0 {
            return Err(BuddyError::not_found(Message::ResourceNotFound(id)));
        }
        Ok(())
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Resource>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_resource)?.collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(|resource| self.with_tags_loaded(resource)).collect()
    }

    fn with_tags_loaded(&self, mut resource: Resource) -> Result<Resource> {
        let mut stmt = self.conn.prepare_cached(SELECT_TAGS_BY_RESOURCE)?;
        resource.tags = stmt
            .query_map(params![resource.id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(resource)
    }
}

fn row_to_resource(row: &Row) -> rusqlite::Result<Resource> {
    Ok(Resource {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        subject_name: row.get(2)?,
        title: row.get(3)?,
        url: row.get(4)?,
        tags: Vec::new(),
        created_at: row.get(5)?,
    })
}
