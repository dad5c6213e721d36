//! The HTTP application: server-rendered pages plus a small JSON API.
//!
//! ```rust,no_run
//! use btech_buddy::libs::config::Config;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::read()?.with_env_overrides();
//! btech_buddy::web::serve(&config).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod forms;
pub mod pages;
pub mod session;
pub mod state;
pub mod views;

use crate::db::db::Db;
use crate::db::sessions::Sessions;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::secret::SessionKey;
use crate::{msg_info, msg_success};
use anyhow::{Context, Result};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::time::Instant;
use tokio::net::TcpListener;

/// Builds the full route table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/healthz", get(pages::healthz))
        .route("/register", get(pages::register_form).post(pages::register))
        .route("/login", get(pages::login_form).post(pages::login))
        .route("/logout", post(pages::logout))
        .route("/dashboard", get(pages::dashboard))
        .route("/subjects", get(pages::subjects))
        .route("/subjects/add", post(pages::subjects_add))
        .route("/subjects/update", post(pages::subjects_update))
        .route("/subjects/delete", post(pages::subjects_delete))
        .route("/timetable", get(pages::timetable))
        .route("/timetable/add", post(pages::timetable_add))
        .route("/timetable/delete", post(pages::timetable_delete))
        .route("/attendance", get(pages::attendance))
        .route("/attendance/mark", post(pages::attendance_mark))
        .route("/attendance/delete", post(pages::attendance_delete))
        .route("/tasks", get(pages::tasks))
        .route("/tasks/add", post(pages::tasks_add))
        .route("/tasks/toggle", post(pages::tasks_toggle))
        .route("/tasks/delete", post(pages::tasks_delete))
        .route("/resources", get(pages::resources))
        .route("/resources/add", post(pages::resources_add))
        .route("/resources/delete", post(pages::resources_delete))
        .route("/coding", get(pages::coding))
        .route("/coding/add", post(pages::coding_add))
        .route("/coding/delete", post(pages::coding_delete))
        .route("/api/me", get(api::me))
        .route("/api/subjects", get(api::subjects))
        .route("/api/tasks", get(api::tasks))
        .route("/api/attendance", get(api::attendance))
        .route("/api/resources", get(api::resources))
        .route("/api/practice", get(api::practice))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Migrates the database, loads the session key and serves until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let db_path = config.db_path()?;
    let storage = DataStorage::new();

    // Migrations run once here; request connections skip them.
    let db = Db::open(&db_path)?;
    let purged = Sessions::new(&db.conn).purge_expired()?;
    if purged > 0 {
        msg_info!(Message::SessionsPurged(purged));
    }
    drop(db);

    let key = SessionKey::load(&storage)?;
    let state = AppState::new(db_path, key, config);

    let address = config.server_config().address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    msg_success!(Message::ServerStarting(address));

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    msg_info!(Message::ServerStopped);
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        msg_info!(Message::ServerShuttingDown);
    }
}
