//! Session cookie handling and the extractors that resolve the logged-in user.

use super::error::{ApiError, WebError};
use super::state::AppState;
use crate::db::sessions::Sessions;
use crate::libs::user::User;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};

/// The logged-in user of a page request. Rejects with a redirect to `/login`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The logged-in user of an API request. Rejects with a 401 JSON body.
#[derive(Debug, Clone)]
pub struct ApiUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve_user(&parts.headers, state).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(WebError::Unauthorized),
        }
    }
}

impl FromRequestParts<AppState> for ApiUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve_user(&parts.headers, state).await? {
            Some(user) => Ok(ApiUser(user)),
            None => Err(ApiError(WebError::Unauthorized)),
        }
    }
}

/// Resolves the session cookie, if any, to a user. A missing, forged,
/// logged-out or expired session yields `None`.
pub async fn resolve_user(headers: &HeaderMap, state: &AppState) -> Result<Option<User>, WebError> {
    let token = match session_token(headers, state) {
        Some(token) => token,
        None => return Ok(None),
    };

    match state.with_db(move |conn| Sessions::new(conn).resolve(&token)).await {
        Ok(user) => Ok(Some(user)),
        Err(WebError::Unauthorized) => Ok(None),
        Err(e) => Err(e),
    }
}

/// The verified token from the request's session cookie.
pub fn session_token(headers: &HeaderMap, state: &AppState) -> Option<String> {
    let value = read_cookie(headers, &state.session().cookie_name)?;
    state.key().verify(&value)
}

/// Starts a session for `user_id` and returns the `Set-Cookie` header for it.
/// Always mints a new token, whatever the client sent.
pub async fn start_session(state: &AppState, user_id: i64) -> Result<HeaderValue, WebError> {
    let ttl_hours = state.session().ttl_hours;
    let token = state
        .with_db(move |conn| Sessions::new(conn).create(user_id, chrono::Duration::hours(ttl_hours)))
        .await?;

    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        state.session().cookie_name,
        state.key().sign(&token),
        ttl_hours * 3600
    );
    HeaderValue::from_str(&cookie).map_err(|e| WebError::Internal(anyhow::anyhow!("invalid session cookie: {e}")))
}

/// Deletes the request's session, if any.
pub async fn end_session(headers: &HeaderMap, state: &AppState) -> Result<(), WebError> {
    if let Some(token) = session_token(headers, state) {
        state.with_db(move |conn| Sessions::new(conn).delete(&token)).await?;
    }
    Ok(())
}

/// A `Set-Cookie` header that makes the browser drop the session cookie.
pub fn clear_cookie(state: &AppState) -> (axum::http::HeaderName, String) {
    (
        SET_COOKIE,
        format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", state.session().cookie_name),
    )
}

/// Finds `name` in the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}
