//! Login sessions.
//!
//! Rows are keyed by the BLAKE3 hash of the session token, so the plain
//! token only exists in the client's cookie.

use crate::libs::error::AuthError;
use crate::libs::formatter::{format_timestamp, now_utc};
use crate::libs::secret::{generate_token, hash_token};
use crate::libs::user::User;
use anyhow::Result;
use chrono::{Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};

const INSERT_SESSION: &str = "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_SESSION_USER: &str = "
    SELECT u.id, u.name, u.email, u.created_at, s.expires_at
    FROM sessions s
    JOIN users u ON u.id = s.user_id
    WHERE s.token_hash = ?1
";
const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token_hash = ?1";
const DELETE_USER_SESSIONS: &str = "DELETE FROM sessions WHERE user_id = ?1";
const DELETE_EXPIRED: &str = "DELETE FROM sessions WHERE expires_at <= ?1";

pub struct Sessions<'a> {
    conn: &'a Connection,
}

impl<'a> Sessions<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Starts a session for `user_id` and returns the fresh token.
    pub fn create(&self, user_id: i64, ttl: Duration) -> Result<String> {
        let token = generate_token()?;
        let expires_at = format_timestamp(&(Utc::now() + ttl).naive_utc());
        self.conn
            .execute(INSERT_SESSION, params![hash_token(&token), user_id, now_utc(), expires_at])?;
        Ok(token)
    }

    /// Looks up the user a token belongs to. Expired sessions are removed
    /// on sight.
    pub fn resolve(&self, token: &str) -> Result<User> {
        let token_hash = hash_token(token);
        let found = self
            .conn
            .query_row(SELECT_SESSION_USER, params![token_hash], |row| {
                Ok((
                    User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        created_at: row.get(3)?,
                    },
                    row.get::<_, String>(4)?,
                ))
            })
            .optional()?;

        match found {
            None => Err(AuthError::NotAuthenticated.into()),
            Some((_, expires_at)) if expires_at <= now_utc() => {
                self.conn.execute(DELETE_SESSION, params![token_hash])?;
                Err(AuthError::SessionExpired.into())
            }
            Some((user, _)) => Ok(user),
        }
    }

    /// Ends one session. Unknown tokens are ignored.
    pub fn delete(&self, token: &str) -> Result<()> {
        self.conn.execute(DELETE_SESSION, params![hash_token(token)])?;
        Ok(())
    }

    pub fn delete_for_user(&self, user_id: i64) -> Result<usize> {
        Ok(self.conn.execute(DELETE_USER_SESSIONS, params![user_id])?)
    }

    pub fn purge_expired(&self) -> Result<usize> {
        Ok(self.conn.execute(DELETE_EXPIRED, params![now_utc()])?)
    }
}
