//! Typed errors raised by the domain layer.
//!
//! Repositories return `anyhow::Result`, but the failures a caller is expected
//! to react to (bad input, a row that is not there, a rejected login) are
//! raised as one of these types so the web layer can downcast them and pick
//! a status code, while the CLI just prints them.

use super::messages::Message;
use thiserror::Error;

/// Errors caused by the caller rather than by the system.
#[derive(Debug, Error)]
pub enum BuddyError {
    /// A field failed validation.
    #[error("{0}")]
    Invalid(Message),

    /// The row does not exist or belongs to someone else.
    #[error("{0}")]
    NotFound(Message),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Errors that can occur while registering, logging in or resolving a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Email '{0}' is already registered. Try logging in.")]
    EmailTaken(String),

    #[error("Password must be at least {0} characters.")]
    WeakPassword(usize),

    #[error("'{0}' is not a valid email address.")]
    InvalidEmail(String),

    #[error("Name is required.")]
    NameRequired,

    /// No cookie, a forged cookie, or a session that was logged out.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Your session has expired, please log in again.")]
    SessionExpired,

    #[error("Failed to hash password: {0}")]
    HashFailed(String),
}

impl AuthError {
    /// Whether the client can fix this by sending something else (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::HashFailed(_))
    }
}

impl BuddyError {
    pub fn invalid(msg: Message) -> anyhow::Error {
        BuddyError::Invalid(msg).into()
    }

    pub fn not_found(msg: Message) -> anyhow::Error {
        BuddyError::NotFound(msg).into()
    }
}
