//! Command-line interface.
//!
//! `buddy serve` runs the web application; the other commands administer
//! accounts and give quick terminal access to one user's data. Domain
//! commands act on behalf of `--user <email>` (or `BUDDY_USER`).

pub mod attendance;
pub mod export;
pub mod init;
pub mod migrations;
pub mod practice;
pub mod resource;
pub mod serve;
pub mod subject;
pub mod task;
pub mod timetable;
pub mod user;

use crate::db::db::Db;
use crate::db::users::Users;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::user::User;
use crate::msg_error_anyhow;
use anyhow::Result;
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Run the web application")]
    Serve(serve::ServeArgs),
    #[command(about = "Inspect database migrations")]
    Migrations(migrations::MigrationsArgs),
    #[command(about = "Manage user accounts")]
    User(user::UserArgs),
    #[command(about = "Manage subjects")]
    Subject(subject::SubjectArgs),
    #[command(about = "Manage the weekly timetable")]
    Timetable(timetable::TimetableArgs),
    #[command(about = "Mark and review attendance")]
    Attendance(attendance::AttendanceArgs),
    #[command(about = "Manage tasks")]
    Task(task::TaskArgs),
    #[command(about = "Manage learning resources")]
    Resource(resource::ResourceArgs),
    #[command(about = "Log coding practice")]
    Practice(practice::PracticeArgs),
    #[command(about = "Export data to CSV or JSON")]
    Export(export::ExportArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Database file to use instead of the configured one
    #[arg(long, global = true, env = "BUDDY_DB_PATH")]
    db: Option<PathBuf>,

    /// Email of the user to act as
    #[arg(short, long, global = true, env = "BUDDY_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// What every command needs to find its data.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub db: Option<PathBuf>,
    pub user: Option<String>,
}

impl Context {
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.db {
            Some(path) => Ok(path.clone()),
            None => Config::read()?.with_env_overrides().db_path(),
        }
    }

    /// Opens the database, migrating it if needed.
    pub fn open(&self) -> Result<Db> {
        Db::open(self.db_path()?)
    }

    /// The account named by `--user`.
    pub fn user(&self, conn: &Connection) -> Result<User> {
        let email = self.user.as_deref().ok_or_else(|| msg_error_anyhow!(Message::UserRequired))?;
        Users::new(conn)
            .find_by_email(email)?
            .ok_or_else(|| msg_error_anyhow!(Message::UserNotFound(email.to_string())))
    }
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        let ctx = Context { db: cli.db, user: cli.user };

        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Serve(args) => serve::cmd(&ctx, args).await,
            Commands::Migrations(args) => migrations::cmd(&ctx, args),
            Commands::User(args) => user::cmd(&ctx, args),
            Commands::Subject(args) => subject::cmd(&ctx, args),
            Commands::Timetable(args) => timetable::cmd(&ctx, args),
            Commands::Attendance(args) => attendance::cmd(&ctx, args),
            Commands::Task(args) => task::cmd(&ctx, args),
            Commands::Resource(args) => resource::cmd(&ctx, args),
            Commands::Practice(args) => practice::cmd(&ctx, args),
            Commands::Export(args) => export::cmd(&ctx, args),
        }
    }
}
