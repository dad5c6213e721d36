//! Read-only JSON endpoints under `/api`.

use super::error::ApiError;
use super::session::ApiUser;
use super::state::AppState;
use crate::db::attendance::Attendance;
use crate::db::practice::Practice;
use crate::db::resources::Resources;
use crate::db::subjects::Subjects;
use crate::db::tasks::Tasks;
use crate::libs::attendance::SubjectAttendance;
use crate::libs::practice::{PracticeEntry, PracticeStats};
use crate::libs::resource::{normalize_tag, Resource};
use crate::libs::subject::Subject;
use crate::libs::task::{Task, TaskFilter};
use crate::libs::user::User;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskQuery {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResourceQuery {
    pub tag: String,
}

#[derive(Debug, Serialize)]
pub struct PracticeLog {
    pub entries: Vec<PracticeEntry>,
    pub stats: PracticeStats,
}

pub async fn me(ApiUser(user): ApiUser) -> Json<User> {
    Json(user)
}

pub async fn subjects(State(state): State<AppState>, ApiUser(user): ApiUser) -> ApiResult<Vec<Subject>> {
    let subjects = state.with_db(move |conn| Subjects::new(conn, user.id).list()).await?;
    Ok(Json(subjects))
}

/// Unknown `status` values fall back to open tasks.
pub async fn tasks(State(state): State<AppState>, ApiUser(user): ApiUser, Query(query): Query<TaskQuery>) -> ApiResult<Vec<Task>> {
    let filter: TaskFilter = query.status.parse().unwrap_or_default();
    let tasks = state.with_db(move |conn| Tasks::new(conn, user.id).fetch(filter)).await?;
    Ok(Json(tasks))
}

pub async fn attendance(State(state): State<AppState>, ApiUser(user): ApiUser) -> ApiResult<Vec<SubjectAttendance>> {
    let summary = state.with_db(move |conn| Attendance::new(conn, user.id).summary()).await?;
    Ok(Json(summary))
}

pub async fn resources(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Query(query): Query<ResourceQuery>,
) -> ApiResult<Vec<Resource>> {
    let tag = normalize_tag(&query.tag);
    let resources = state
        .with_db(move |conn| {
            let repo = Resources::new(conn, user.id);
            if tag.is_empty() {
                repo.list()
            } else {
                repo.with_tag(&tag)
            }
        })
        .await?;
    Ok(Json(resources))
}

pub async fn practice(State(state): State<AppState>, ApiUser(user): ApiUser) -> ApiResult<PracticeLog> {
    let today = Local::now().date_naive();
    let log = state
        .with_db(move |conn| {
            let practice = Practice::new(conn, user.id);
            Ok(PracticeLog {
                entries: practice.list(None)?,
                stats: practice.stats(today)?,
            })
        })
        .await?;
    Ok(Json(log))
}
