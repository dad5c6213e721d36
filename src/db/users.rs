use crate::libs::error::AuthError;
use crate::libs::formatter::now_local;
use crate::libs::password::{hash_password, verify_dummy, verify_password, MIN_PASSWORD_LEN};
use crate::libs::user::{normalize_email, NewUser, User};
use anyhow::Result;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

const INSERT_USER: &str = "INSERT INTO users (name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_USER_BY_ID: &str = "SELECT id, name, email, created_at FROM users WHERE id = ?1";
const SELECT_USER_BY_EMAIL: &str = "SELECT id, name, email, created_at FROM users WHERE email = ?1";
const SELECT_CREDENTIALS: &str = "SELECT id, name, email, created_at, password_hash FROM users WHERE email = ?1";
const SELECT_ALL_USERS: &str = "SELECT id, name, email, created_at FROM users ORDER BY id";
const UPDATE_PASSWORD: &str = "UPDATE users SET password_hash = ?2 WHERE id = ?1";
const DELETE_USER_SESSIONS: &str = "DELETE FROM sessions WHERE user_id = ?1";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";

/// Account storage: registration, login checks and administration.
pub struct Users<'a> {
    conn: &'a Connection,
}

impl<'a> Users<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Validates and stores a new account.
    pub fn register(&self, new_user: NewUser) -> Result<User> {
        let new_user = new_user.validated()?;
        if self.find_by_email(&new_user.email)?.is_some() {
            return Err(AuthError::EmailTaken(new_user.email).into());
        }

        let password_hash = hash_password(&new_user.password)?;
        let inserted = self
            .conn
            .execute(INSERT_USER, params![new_user.name, new_user.email, password_hash, now_local()]);
        match inserted {
            Ok(_) => {}
            // Lost a race with a concurrent registration.
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(AuthError::EmailTaken(new_user.email).into());
            }
            Err(e) => return Err(e.into()),
        }

        self.get(self.conn.last_insert_rowid())?
            .ok_or_else(|| AuthError::EmailTaken(new_user.email).into())
    }

    /// Checks an email/password pair. Unknown emails and wrong passwords
    /// produce the same error.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let found = self
            .conn
            .query_row(SELECT_CREDENTIALS, params![normalize_email(email)], |row| {
                Ok((row_to_user(row)?, row.get::<_, String>(4)?))
            })
            .optional()?;

        let verified = match &found {
            Some((_, hash)) => verify_password(password, hash),
            None => verify_dummy(password),
        };
        match found {
            Some((user, _)) if verified => Ok(user),
            _ => Err(AuthError::InvalidCredentials.into()),
        }
    }

    pub fn get(&self, id: i64) -> Result<Option<User>> {
        Ok(self.conn.query_row(SELECT_USER_BY_ID, params![id], row_to_user).optional()?)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .conn
            .query_row(SELECT_USER_BY_EMAIL, params![normalize_email(email)], row_to_user)
            .optional()?)
    }

    pub fn list(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(SELECT_ALL_USERS)?;
        let users = stmt.query_map([], row_to_user)?.collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Replaces the password and signs the user out everywhere.
    pub fn change_password(&self, user_id: i64, new_password: &str) -> Result<()> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN).into());
        }
        let password_hash = hash_password(new_password)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(UPDATE_PASSWORD, params![user_id, password_hash])?;
        tx.execute(DELETE_USER_SESSIONS, params![user_id])?;
        tx.commit()?;
        Ok(())
    }

    /// Removes the account; every owned row goes with it.
    pub fn delete(&self, user_id: i64) -> Result<bool> {
        Ok(self.conn.execute(DELETE_USER, params![user_id])? > 0)
    }
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: row.get(3)?,
    })
}
