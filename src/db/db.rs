use super::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "buddy.db";

/// An open SQLite connection with foreign keys enforced and the schema
/// migrated to the latest version.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database in the default data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Self::open(db_file_path)
    }

    /// Opens (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        let mut conn = Self::connect(path.as_ref())?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Opens a connection without touching the schema.
    pub fn open_without_migrations(path: impl AsRef<Path>) -> Result<Connection> {
        Self::connect(path.as_ref())
    }

    fn connect(path: &Path) -> Result<Connection> {
        let conn = Connection::open(path).with_context(|| Message::DbConnectionFailed(path.display().to_string()))?;
        // Off by default in SQLite, per connection. Subject and user cascades need it.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(conn)
    }
}
