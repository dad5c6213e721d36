use super::error::AuthError;
use super::password::MIN_PASSWORD_LEN;
use serde::Serialize;

/// A registered account. The password hash never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// Registration input, as typed by the user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// Trims the name, normalises the email and enforces the password policy.
    pub fn validated(self) -> Result<Self, AuthError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AuthError::NameRequired);
        }

        let email = normalize_email(&self.email);
        if !is_plausible_email(&email) {
            return Err(AuthError::InvalidEmail(self.email.trim().to_string()));
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
        }

        Ok(Self {
            name,
            email,
            password: self.password,
        })
    }
}

/// Emails are the login identifier and compare case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace),
        None => false,
    }
}
