use super::error::WebError;
use crate::db::db::Db;
use crate::libs::config::{AttendanceConfig, Config, SessionConfig};
use crate::libs::secret::SessionKey;
use anyhow::anyhow;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Arc;

/// Immutable settings shared by every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    db_path: PathBuf,
    key: SessionKey,
    session: SessionConfig,
    attendance: AttendanceConfig,
}

impl AppState {
    /// Expects the database at `db_path` to be migrated already.
    pub fn new(db_path: PathBuf, key: SessionKey, config: &Config) -> Self {
        Self {
            inner: Arc::new(Inner {
                db_path,
                key,
                session: config.session_config(),
                attendance: config.attendance_config(),
            }),
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.inner.key
    }

    pub fn session(&self) -> &SessionConfig {
        &self.inner.session
    }

    pub fn attendance(&self) -> &AttendanceConfig {
        &self.inner.attendance
    }

    /// Runs `f` against a fresh connection on the blocking pool.
    pub async fn with_db<F, T>(&self, f: F) -> Result<T, WebError>
    where
        F: FnOnce(&Connection) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.inner.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Db::open_without_migrations(&path)?;
            f(&conn)
        })
        .await
        .map_err(|e| WebError::Internal(anyhow!("database task failed: {e}")))?
        .map_err(WebError::from)
    }
}
