//! Handlers for the server-rendered pages and their form posts.
//!
//! A successful post answers `303 See Other`. A post that fails validation
//! re-renders its page with the message and status 400.

use super::error::WebError;
use super::forms::*;
use super::session::{clear_cookie, end_session, resolve_user, start_session, CurrentUser};
use super::state::AppState;
use super::views;
use crate::db::attendance::Attendance;
use crate::db::practice::Practice;
use crate::db::resources::Resources;
use crate::db::subjects::Subjects;
use crate::db::tasks::Tasks;
use crate::db::timetable::Timetable;
use crate::db::users::Users;
use crate::libs::error::BuddyError;
use crate::libs::messages::Message;
use crate::libs::resource::normalize_tag;
use crate::libs::task::TaskFilter;
use crate::libs::timetable::{parse_weekday, today_index};
use crate::libs::user::{NewUser, User};
use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Local;
use serde::Deserialize;
use std::future::Future;

/// Recent attendance records shown under the summary.
const RECENT_ATTENDANCE: usize = 50;
const RESOURCE_LIMIT: usize = 200;
const DASHBOARD_TASKS: usize = 10;
const DASHBOARD_HORIZON_DAYS: i64 = 7;

type Page = Result<Html<String>, WebError>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DayQuery {
    pub day: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowQuery {
    pub show: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TagQuery {
    pub tag: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlatformQuery {
    pub platform: String,
}

/// Redirects to `location` on success. A validation failure re-renders the
/// page through `rerender` with status 400; anything else propagates.
async fn settle<F, Fut>(result: Result<(), WebError>, location: &str, rerender: F) -> Result<Response, WebError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, WebError>>,
{
    match result {
        Ok(()) => Ok(Redirect::to(location).into_response()),
        Err(WebError::BadRequest(msg)) => {
            let html = rerender(msg).await?;
            Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
        }
        Err(e) => Err(e),
    }
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn blank_to_none(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Result<Redirect, WebError> {
    match resolve_user(&headers, &state).await? {
        Some(_) => Ok(Redirect::to("/dashboard")),
        None => Ok(Redirect::to("/login")),
    }
}

pub async fn healthz() -> &'static str {
    "ok"
}

// ---------- auth ----------

pub async fn register_form() -> Html<String> {
    Html(views::register_page(None, "", ""))
}

pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Result<Response, WebError> {
    let new_user = NewUser::new(&form.name, &form.email, &form.password);
    let result = state
        .with_db(move |conn| Users::new(conn).register(new_user).map(|_| ()))
        .await;
    settle(result, "/login", |msg| async move { Ok(views::register_page(Some(&msg), &form.name, &form.email)) }).await
}

pub async fn login_form() -> Html<String> {
    Html(views::login_page(None, ""))
}

pub async fn login(State(state): State<AppState>, headers: HeaderMap, Form(form): Form<LoginForm>) -> Result<Response, WebError> {
    let (email, password) = (form.email.clone(), form.password);
    let authenticated = state
        .with_db(move |conn| Users::new(conn).authenticate(&email, &password))
        .await;

    let user = match authenticated {
        Ok(user) => user,
        Err(WebError::BadRequest(msg)) => {
            return Ok((StatusCode::BAD_REQUEST, Html(views::login_page(Some(&msg), &form.email))).into_response());
        }
        Err(e) => return Err(e),
    };

    // Whatever session the browser arrived with is discarded, never promoted.
    end_session(&headers, &state).await?;
    let cookie = start_session(&state, user.id).await?;
    tracing::info!(user_id = user.id, "user logged in");
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, WebError> {
    end_session(&headers, &state).await?;
    Ok(([clear_cookie(&state)], Redirect::to("/login")).into_response())
}

// ---------- dashboard ----------

pub async fn dashboard(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Page {
    let user_id = user.id;
    let now = Local::now().date_naive();
    let weekday = today_index();
    let data = state
        .with_db(move |conn| {
            Ok(views::Dashboard {
                today: now.format("%Y-%m-%d").to_string(),
                weekday,
                classes: Timetable::new(conn, user_id).for_day(weekday)?,
                tasks: Tasks::new(conn, user_id).upcoming(now, DASHBOARD_HORIZON_DAYS, DASHBOARD_TASKS)?,
                attendance: Attendance::new(conn, user_id).summary()?,
            })
        })
        .await?;
    Ok(Html(views::dashboard_page(&user, &data)))
}

// ---------- subjects ----------

async fn render_subjects(state: &AppState, user: &User, error: Option<String>) -> Result<String, WebError> {
    let user_id = user.id;
    let subjects = state.with_db(move |conn| Subjects::new(conn, user_id).list()).await?;
    Ok(views::subjects_page(user, &subjects, state.attendance().default_target, error.as_deref()))
}

pub async fn subjects(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Page {
    Ok(Html(render_subjects(&state, &user, None).await?))
}

pub async fn subjects_add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<SubjectForm>,
) -> Result<Response, WebError> {
    let (user_id, target) = (user.id, state.attendance().default_target);
    let result = state
        .with_db(move |conn| Subjects::new(conn, user_id).create(form.to_new_subject(target)?).map(|_| ()))
        .await;
    settle(result, "/subjects", |msg| render_subjects(&state, &user, Some(msg))).await
}

pub async fn subjects_update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<SubjectForm>,
) -> Result<Response, WebError> {
    let (user_id, target) = (user.id, state.attendance().default_target);
    let result = state
        .with_db(move |conn| {
            let id = parse_id(&form.subject_id, "subject")?;
            Subjects::new(conn, user_id).update(id, form.to_new_subject(target)?).map(|_| ())
        })
        .await;
    settle(result, "/subjects", |msg| render_subjects(&state, &user, Some(msg))).await
}

pub async fn subjects_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<DeleteForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let result = state
        .with_db(move |conn| Subjects::new(conn, user_id).delete(parse_id(&form.id, "subject")?))
        .await;
    settle(result, "/subjects", |msg| render_subjects(&state, &user, Some(msg))).await
}

// ---------- timetable ----------

/// The requested weekday, defaulting to today for a missing or unknown value.
fn requested_day(day: &str) -> u8 {
    parse_weekday(day).unwrap_or_else(|_| today_index())
}

async fn render_timetable(state: &AppState, user: &User, day: u8, error: Option<String>) -> Result<String, WebError> {
    let user_id = user.id;
    let (entries, subjects) = state
        .with_db(move |conn| Ok((Timetable::new(conn, user_id).for_day(day)?, Subjects::new(conn, user_id).list()?)))
        .await?;
    Ok(views::timetable_page(user, day, &entries, &subjects, error.as_deref()))
}

pub async fn timetable(State(state): State<AppState>, CurrentUser(user): CurrentUser, Query(query): Query<DayQuery>) -> Page {
    Ok(Html(render_timetable(&state, &user, requested_day(&query.day), None).await?))
}

pub async fn timetable_add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<TimetableForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let day = requested_day(&form.day_of_week);
    let result = state
        .with_db(move |conn| Timetable::new(conn, user_id).add(form.to_new_entry()?).map(|_| ()))
        .await;
    let location = format!("/timetable?day={}", day);
    settle(result, &location, |msg| render_timetable(&state, &user, day, Some(msg))).await
}

pub async fn timetable_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<DeleteForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let day = requested_day(&form.back);
    let result = state
        .with_db(move |conn| Timetable::new(conn, user_id).delete(parse_id(&form.id, "class")?))
        .await;
    let location = format!("/timetable?day={}", day);
    settle(result, &location, |msg| render_timetable(&state, &user, day, Some(msg))).await
}

// ---------- attendance ----------

async fn render_attendance(state: &AppState, user: &User, error: Option<String>) -> Result<String, WebError> {
    let user_id = user.id;
    let (summary, records, subjects) = state
        .with_db(move |conn| {
            let attendance = Attendance::new(conn, user_id);
            Ok((attendance.summary()?, attendance.recent(RECENT_ATTENDANCE)?, Subjects::new(conn, user_id).list()?))
        })
        .await?;
    Ok(views::attendance_page(user, &summary, &records, &subjects, &today(), error.as_deref()))
}

pub async fn attendance(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Page {
    Ok(Html(render_attendance(&state, &user, None).await?))
}

pub async fn attendance_mark(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<AttendanceForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let result = state
        .with_db(move |conn| Attendance::new(conn, user_id).mark(form.to_new_attendance()?).map(|_| ()))
        .await;
    settle(result, "/attendance", |msg| render_attendance(&state, &user, Some(msg))).await
}

pub async fn attendance_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<DeleteForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let result = state
        .with_db(move |conn| Attendance::new(conn, user_id).delete(parse_id(&form.id, "record")?))
        .await;
    settle(result, "/attendance", |msg| render_attendance(&state, &user, Some(msg))).await
}

// ---------- tasks ----------

async fn render_tasks(state: &AppState, user: &User, show: TaskFilter, error: Option<String>) -> Result<String, WebError> {
    let user_id = user.id;
    let (tasks, subjects) = state
        .with_db(move |conn| Ok((Tasks::new(conn, user_id).fetch(show)?, Subjects::new(conn, user_id).list()?)))
        .await?;
    Ok(views::tasks_page(user, show, &tasks, &subjects, error.as_deref()))
}

fn tasks_location(show: TaskFilter) -> String {
    format!("/tasks?show={}", show.as_str())
}

pub async fn tasks(State(state): State<AppState>, CurrentUser(user): CurrentUser, Query(query): Query<ShowQuery>) -> Page {
    let show = query.show.parse().unwrap_or_default();
    Ok(Html(render_tasks(&state, &user, show, None).await?))
}

pub async fn tasks_add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<TaskForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let result = state
        .with_db(move |conn| Tasks::new(conn, user_id).insert(form.to_new_task()?).map(|_| ()))
        .await;
    let show = TaskFilter::Todo;
    settle(result, &tasks_location(show), |msg| render_tasks(&state, &user, show, Some(msg))).await
}

pub async fn tasks_toggle(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<TaskStatusForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let show: TaskFilter = form.show.parse().unwrap_or_default();
    let result = state
        .with_db(move |conn| {
            let id = parse_id(&form.task_id, "task")?;
            let tasks = Tasks::new(conn, user_id);
            match form.next_status.trim().to_lowercase().as_str() {
                "" => tasks.toggle(id).map(|_| ()),
                "done" => tasks.set_done(id, true),
                "todo" => tasks.set_done(id, false),
                other => Err(BuddyError::invalid(Message::InvalidInput(format!("unknown task status '{}'", other)))),
            }
        })
        .await;
    settle(result, &tasks_location(show), |msg| render_tasks(&state, &user, show, Some(msg))).await
}

pub async fn tasks_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<DeleteForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let show: TaskFilter = form.back.parse().unwrap_or_default();
    let result = state
        .with_db(move |conn| Tasks::new(conn, user_id).delete(parse_id(&form.id, "task")?))
        .await;
    settle(result, &tasks_location(show), |msg| render_tasks(&state, &user, show, Some(msg))).await
}

// ---------- resources ----------

async fn render_resources(state: &AppState, user: &User, tag: Option<String>, error: Option<String>) -> Result<String, WebError> {
    let user_id = user.id;
    let filter = tag.clone();
    let (resources, tags, subjects) = state
        .with_db(move |conn| {
            let repo = Resources::new(conn, user_id);
            let mut resources = match &filter {
                Some(tag) => repo.with_tag(tag)?,
                None => repo.list()?,
            };
            resources.truncate(RESOURCE_LIMIT);
            Ok((resources, repo.tags()?, Subjects::new(conn, user_id).list()?))
        })
        .await?;
    Ok(views::resources_page(user, tag.as_deref(), &resources, &tags, &subjects, error.as_deref()))
}

pub async fn resources(State(state): State<AppState>, CurrentUser(user): CurrentUser, Query(query): Query<TagQuery>) -> Page {
    let tag = blank_to_none(&normalize_tag(&query.tag));
    Ok(Html(render_resources(&state, &user, tag, None).await?))
}

pub async fn resources_add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ResourceForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let result = state
        .with_db(move |conn| Resources::new(conn, user_id).add(form.to_new_resource()?).map(|_| ()))
        .await;
    settle(result, "/resources", |msg| render_resources(&state, &user, None, Some(msg))).await
}

pub async fn resources_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<DeleteForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let result = state
        .with_db(move |conn| Resources::new(conn, user_id).delete(parse_id(&form.id, "resource")?))
        .await;
    settle(result, "/resources", |msg| render_resources(&state, &user, None, Some(msg))).await
}

// ---------- coding practice ----------

async fn render_coding(state: &AppState, user: &User, platform: Option<String>, error: Option<String>) -> Result<String, WebError> {
    let user_id = user.id;
    let filter = platform.clone();
    let now = Local::now().date_naive();
    let (entries, stats) = state
        .with_db(move |conn| {
            let practice = Practice::new(conn, user_id);
            Ok((practice.list(filter.as_deref())?, practice.stats(now)?))
        })
        .await?;
    Ok(views::coding_page(user, platform.as_deref(), &entries, &stats, &today(), error.as_deref()))
}

pub async fn coding(State(state): State<AppState>, CurrentUser(user): CurrentUser, Query(query): Query<PlatformQuery>) -> Page {
    Ok(Html(render_coding(&state, &user, blank_to_none(&query.platform), None).await?))
}

pub async fn coding_add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<PracticeForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let result = state
        .with_db(move |conn| Practice::new(conn, user_id).add(form.to_new_entry()?).map(|_| ()))
        .await;
    settle(result, "/coding", |msg| render_coding(&state, &user, None, Some(msg))).await
}

pub async fn coding_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<DeleteForm>,
) -> Result<Response, WebError> {
    let user_id = user.id;
    let result = state
        .with_db(move |conn| Practice::new(conn, user_id).delete(parse_id(&form.id, "log entry")?))
        .await;
    settle(result, "/coding", |msg| render_coding(&state, &user, None, Some(msg))).await
}
