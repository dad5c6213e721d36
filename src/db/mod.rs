//! Database layer for BTech Buddy.
//!
//! Everything lives in one SQLite file. [`db::Db`] opens it with foreign keys
//! enforced and runs pending migrations; the repositories below borrow that
//! connection and are scoped to a single user, so one user's rows are never
//! visible through another user's repository.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use btech_buddy::db::{db::Db, subjects::Subjects, tasks::Tasks};
//! use btech_buddy::libs::subject::NewSubject;
//! use btech_buddy::libs::task::{NewTask, TaskFilter};
//!
//! let db = Db::open("buddy.db")?;
//! let user_id = 1;
//! let subject = Subjects::new(&db.conn, user_id).create(NewSubject::new("Data Structures"))?;
//!
//! let mut task = NewTask::new("Finish lab 3");
//! task.subject_id = Some(subject.id);
//! Tasks::new(&db.conn, user_id).insert(task)?;
//! let open = Tasks::new(&db.conn, user_id).fetch(TaskFilter::Todo)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod attendance;
pub mod db;
pub mod migrations;
pub mod practice;
pub mod resources;
pub mod sessions;
pub mod subjects;
pub mod tasks;
pub mod timetable;
pub mod users;
