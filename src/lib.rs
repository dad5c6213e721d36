//! # BTech Buddy
//!
//! A student productivity tracker: subjects, a weekly timetable, attendance
//! with "can I skip this class?" guidance, tasks, learning resources and a
//! coding-practice log.
//!
//! ## Features
//!
//! - **Web application**: server-rendered pages with session login (`buddy serve`)
//! - **JSON API**: read-only `/api/*` endpoints for the logged-in user
//! - **Attendance calculator**: percentage, safe absences and classes needed per subject
//! - **Command line**: account administration and quick entry for every module
//! - **Data Export**: tasks, attendance and practice logs to CSV or JSON
//!
//! ## Usage
//!
//! ```rust,no_run
//! use btech_buddy::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
pub mod web;
