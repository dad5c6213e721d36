//! Mapping from domain failures to HTTP responses.
//!
//! Pages and the JSON API share [`WebError`]; they differ only in how it is
//! rendered. A page request that is not logged in is sent to `/login`, an
//! API request gets a 401 with a JSON body.

use super::views;
use crate::libs::error::{AuthError, BuddyError};
use crate::libs::messages::Message;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum WebError {
    Unauthorized,
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text shown to the client. Internal details stay in the log.
    fn public_message(&self) -> String {
        match self {
            WebError::Unauthorized => Message::NotAuthenticated.to_string(),
            WebError::BadRequest(msg) | WebError::NotFound(msg) => msg.clone(),
            WebError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    fn log(&self) {
        if let WebError::Internal(e) = self {
            tracing::error!("{}", Message::RequestFailed(format!("{e:#}")));
        }
    }
}

impl From<AuthError> for WebError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotAuthenticated | AuthError::SessionExpired => WebError::Unauthorized,
            e if e.is_client_error() => WebError::BadRequest(e.to_string()),
            e => WebError::Internal(e.into()),
        }
    }
}

impl From<anyhow::Error> for WebError {
    fn from(e: anyhow::Error) -> Self {
        let e = match e.downcast::<BuddyError>() {
            Ok(BuddyError::Invalid(msg)) => return WebError::BadRequest(msg.to_string()),
            Ok(BuddyError::NotFound(msg)) => return WebError::NotFound(msg.to_string()),
            Ok(BuddyError::Auth(auth)) => return auth.into(),
            Err(e) => e,
        };
        match e.downcast::<AuthError>() {
            Ok(auth) => auth.into(),
            Err(e) => WebError::Internal(e),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            WebError::Unauthorized => Redirect::to("/login").into_response(),
            other => (other.status(), Html(views::error_page(other.status(), &other.public_message()))).into_response(),
        }
    }
}

/// The JSON rendering of [`WebError`], used by `/api/*` handlers.
#[derive(Debug)]
pub struct ApiError(pub WebError);

impl<E: Into<WebError>> From<E> for ApiError {
    fn from(e: E) -> Self {
        ApiError(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.log();
        let body = json!({ "error": self.0.public_message() });
        (self.0.status(), Json(body)).into_response()
    }
}
