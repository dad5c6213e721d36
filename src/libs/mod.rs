//! Core library modules for BTech Buddy.
//!
//! ## Features
//!
//! - **Core Infrastructure**: Configuration, data storage, messaging, errors
//! - **Domain Types**: Subjects, timetable, attendance, tasks, resources, practice log
//! - **Accounts**: Password hashing, session tokens and the signing key
//! - **User Interface**: Terminal tables, formatting, data export
//!
//! ## Usage
//!
//! ```rust
//! use btech_buddy::libs::attendance::AttendanceStats;
//! use btech_buddy::libs::formatter::format_percentage;
//!
//! let stats = AttendanceStats::compute(18, 2, 75.0);
//! assert_eq!(format_percentage(stats.percentage), "90.0%");
//! ```

pub mod attendance;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod formatter;
pub mod messages;
pub mod password;
pub mod practice;
pub mod resource;
pub mod secret;
pub mod subject;
pub mod task;
pub mod timetable;
pub mod user;
pub mod view;
