//! Session tokens and the key that signs them.
//!
//! A session cookie carries `<token>.<mac>`: a random token plus a keyed
//! BLAKE3 hash of it. The database only ever stores `hash_token(token)`, so
//! neither a leaked cookie jar nor a leaked database is enough on its own to
//! forge a login.
//!
//! The key comes from `BUDDY_SECRET_KEY` when set. Otherwise a random key is
//! generated once and kept in `.session_key` in the data directory.

use super::data_storage::DataStorage;
use super::messages::Message;
use crate::{msg_error_anyhow, msg_warning};
use anyhow::{Context, Result};
use base64::prelude::*;
use std::env;
use std::fs;
use std::path::Path;

pub const SESSION_KEY_FILE: &str = ".session_key";
const KEY_CONTEXT: &str = "btech-buddy 2025-01 session cookie mac";
const TOKEN_BYTES: usize = 32;

#[derive(Clone)]
pub struct SessionKey {
    key: [u8; 32],
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

impl SessionKey {
    /// Derives the MAC key from an operator-supplied secret of any length.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()),
        }
    }

    /// Resolves the key from the environment, falling back to the key file.
    pub fn load(storage: &DataStorage) -> Result<Self> {
        match env::var("BUDDY_SECRET_KEY") {
            Ok(secret) if !secret.trim().is_empty() => Ok(Self::from_secret(secret.trim())),
            _ => Self::load_or_generate(&storage.get_path(SESSION_KEY_FILE)?),
        }
    }

    /// Reads the key file, creating it with fresh random bytes if missing.
    pub fn load_or_generate(path: &Path) -> Result<Self> {
        if path.exists() {
            let encoded = fs::read_to_string(path)?;
            let bytes = BASE64_STANDARD
                .decode(encoded.trim())
                .map_err(|_| msg_error_anyhow!(Message::SecretKeyInvalid))?;
            let key: [u8; 32] = bytes.try_into().map_err(|_| msg_error_anyhow!(Message::SecretKeyInvalid))?;
            return Ok(Self { key });
        }

        let mut key = [0u8; 32];
        getrandom::fill(&mut key).map_err(|e| anyhow::anyhow!("failed to generate session key: {e}"))?;
        write_private(path, BASE64_STANDARD.encode(key).as_bytes())
            .with_context(|| Message::SecretKeyGenerated(path.display().to_string()))?;
        msg_warning!(Message::SecretKeyGenerated(path.display().to_string()));

        Ok(Self { key })
    }

    fn mac(&self, token: &str) -> blake3::Hash {
        blake3::keyed_hash(&self.key, token.as_bytes())
    }

    /// Produces the cookie value for `token`.
    pub fn sign(&self, token: &str) -> String {
        format!("{}.{}", token, self.mac(token).to_hex())
    }

    /// Returns the token inside a cookie value if its MAC checks out.
    pub fn verify(&self, cookie_value: &str) -> Option<String> {
        let (token, mac) = cookie_value.split_once('.')?;
        if token.is_empty() {
            return None;
        }
        let presented = blake3::Hash::from_hex(mac).ok()?;
        // blake3::Hash equality is constant time.
        if presented == self.mac(token) {
            Some(token.to_string())
        } else {
            None
        }
    }
}

/// A fresh URL-safe session token from the OS random source.
pub fn generate_token() -> Result<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::fill(&mut bytes).map_err(|e| anyhow::anyhow!("failed to generate session token: {e}"))?;
    Ok(BASE64_URL_SAFE_NO_PAD.encode(bytes))
}

/// The form a token takes in the `sessions` table.
pub fn hash_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new().write(true).create_new(true).mode(0o600).open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sign_and_verify() {
        let key = SessionKey::from_secret("hunter2");
        let token = generate_token().unwrap();
        let cookie = key.sign(&token);

        assert_eq!(key.verify(&cookie), Some(token.clone()));
        assert_eq!(SessionKey::from_secret("other").verify(&cookie), None);
    }

    #[test]
    fn test_tampered_cookie_is_rejected() {
        let key = SessionKey::from_secret("hunter2");
        let cookie = key.sign("abc");
        let forged = cookie.replacen("abc", "abd", 1);

        assert_eq!(key.verify(&forged), None);
        assert_eq!(key.verify("no-dot-here"), None);
        assert_eq!(key.verify(".deadbeef"), None);
    }

    #[test]
    fn test_tokens_are_unique_and_dot_free() {
        let a = generate_token().unwrap();
        let b = generate_token().unwrap();
        assert_ne!(a, b);
        assert!(!a.contains('.'));
        assert_ne!(hash_token(&a), a);
    }

    #[test]
    fn test_key_file_is_reused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_KEY_FILE);

        let first = SessionKey::load_or_generate(&path).unwrap();
        let second = SessionKey::load_or_generate(&path).unwrap();
        let cookie = first.sign("token");
        assert_eq!(second.verify(&cookie), Some("token".to_string()));
    }

    #[test]
    fn test_corrupt_key_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_KEY_FILE);
        fs::write(&path, "not base64 at all!").unwrap();

        assert!(SessionKey::load_or_generate(&path).is_err());
    }
}
