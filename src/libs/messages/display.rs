//! Display implementation for application messages.
//!
//! All user-facing text is defined here, in one place, so the CLI, the web
//! pages and the logs word things the same way.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigParseError(error) => format!("Failed to parse configuration: {}", error),
            Message::ConfigModuleServer => "Server settings".to_string(),
            Message::ConfigModuleSession => "Session settings".to_string(),
            Message::ConfigModuleAttendance => "Attendance settings".to_string(),
            Message::PromptSelectModules => "Select sections to configure".to_string(),
            Message::PromptServerHost => "Enter the address to listen on".to_string(),
            Message::PromptServerPort => "Enter the port to listen on".to_string(),
            Message::PromptSessionTtl => "Enter session lifetime (hours)".to_string(),
            Message::PromptCookieName => "Enter session cookie name".to_string(),
            Message::PromptDefaultTarget => "Enter default attendance target (%)".to_string(),

            // === USER MESSAGES ===
            Message::UserCreated(email) => format!("User '{}' created", email),
            Message::UserDeleted(email) => format!("User '{}' and all their data deleted", email),
            Message::UserNotFound(email) => format!("No user registered with email '{}'", email),
            Message::UserRequired => "Pass --user <email> or set BUDDY_USER".to_string(),
            Message::UsersNotFound => "No users registered yet".to_string(),
            Message::UsersHeader => "Users".to_string(),
            Message::PasswordChanged(email) => format!("Password changed for '{}', existing sessions signed out", email),
            Message::PromptUserName => "Enter display name".to_string(),
            Message::PromptPassword => "Enter password".to_string(),
            Message::PromptPasswordConfirm => "Repeat password".to_string(),
            Message::PasswordsDoNotMatch => "Passwords do not match".to_string(),
            Message::ConfirmDeleteUser(email) => format!("Delete '{}' and everything they own?", email),

            // === AUTHENTICATION MESSAGES ===
            Message::NameRequired => "Name is required.".to_string(),
            Message::NotAuthenticated => "Not authenticated".to_string(),

            // === SUBJECT MESSAGES ===
            Message::SubjectCreated(name) => format!("Subject '{}' added", name),
            Message::SubjectDeleted(id) => format!("Subject {} deleted along with its timetable and attendance", id),
            Message::SubjectNotFound(id) => format!("Subject with ID {} not found.", id),
            Message::SubjectsNotFound => "No subjects yet. Add one first.".to_string(),
            Message::SubjectsHeader => "Subjects".to_string(),
            Message::ConfirmDeleteSubject(name) => format!("Delete '{}' with its timetable and attendance?", name),
            Message::InvalidTarget(target) => format!("Attendance target must be between 0 and 100, got {}.", target),
            Message::InvalidCredits(credits) => format!("Credits cannot be negative, got {}.", credits),

            // === TIMETABLE MESSAGES ===
            Message::TimetableEntryAdded(day) => format!("Class added on {}", day),
            Message::TimetableEntryDeleted(id) => format!("Timetable entry {} deleted", id),
            Message::TimetableEntryNotFound(id) => format!("Timetable entry with ID {} not found.", id),
            Message::TimetableEmpty(day) => format!("No classes on {}", day),
            Message::TimetableHeader(day) => format!("Timetable for {}", day),
            Message::InvalidTime(time) => format!("'{}' is not a valid time, use HH:MM.", time),
            Message::InvalidTimeRange(start, end) => format!("Class must end after it starts ({} - {}).", start, end),
            Message::InvalidWeekday(day) => format!("'{}' is not a weekday (use 0-6 or Mon..Sun).", day),

            // === ATTENDANCE MESSAGES ===
            Message::AttendanceMarked { subject, date, status } => {
                format!("Marked {} for {} on {}", status, subject, date)
            }
            Message::AttendanceRecordDeleted(id) => format!("Attendance record {} deleted", id),
            Message::AttendanceRecordNotFound(id) => format!("Attendance record with ID {} not found.", id),
            Message::AttendanceSummaryHeader => "Attendance summary".to_string(),
            Message::AttendanceRecentHeader => "Recent attendance".to_string(),
            Message::NoAttendanceRecords => "No attendance recorded yet".to_string(),
            Message::AttendanceNoData => "no data".to_string(),
            Message::InvalidAttendanceStatus(status) => format!("Invalid status '{}', use present or absent.", status),
            Message::InvalidDate(date) => format!("'{}' is not a valid date, use YYYY-MM-DD.", date),

            // === TASK MESSAGES ===
            Message::TaskCreated(title) => format!("Task '{}' created", title),
            Message::TaskDeleted(id) => format!("Task {} deleted", id),
            Message::TaskNotFound(id) => format!("Task with ID {} not found.", id),
            Message::TaskMarkedDone(id) => format!("Task {} marked as done", id),
            Message::TaskReopened(id) => format!("Task {} moved back to todo", id),
            Message::TasksNotFound => "Tasks not found".to_string(),
            Message::TasksHeader(filter) => format!("Tasks ({})", filter),
            Message::TitleRequired => "Title is required.".to_string(),

            // === RESOURCE MESSAGES ===
            Message::ResourceAdded(title) => format!("Resource '{}' saved", title),
            Message::ResourceDeleted(id) => format!("Resource {} deleted", id),
            Message::ResourceNotFound(id) => format!("Resource with ID {} not found.", id),
            Message::ResourcesNotFound => "No resources saved yet".to_string(),
            Message::ResourcesHeader => "Resources".to_string(),
            Message::ResourcesWithTagHeader(tag) => format!("Resources tagged '{}'", tag),
            Message::TagsHeader => "Tags".to_string(),
            Message::NoTagsFound => "No tags in use".to_string(),
            Message::UrlRequired => "URL is required.".to_string(),
            Message::InvalidUrl(url) => format!("'{}' does not look like a link (expected http:// or https://).", url),

            // === PRACTICE LOG MESSAGES ===
            Message::PracticeLogged(problem) => format!("Logged '{}'", problem),
            Message::PracticeEntryDeleted(id) => format!("Practice entry {} deleted", id),
            Message::PracticeEntryNotFound(id) => format!("Practice entry with ID {} not found.", id),
            Message::PracticeLogEmpty => "Nothing logged yet. Go solve something!".to_string(),
            Message::PracticeHeader => "Coding practice".to_string(),
            Message::PracticeStats { total, streak } => {
                format!("{} problems logged, current streak: {} day(s)", total, streak)
            }
            Message::PlatformRequired => "Platform is required.".to_string(),
            Message::ProblemRequired => "Problem is required.".to_string(),
            Message::InvalidPracticeStatus(status) => {
                format!("Invalid status '{}', use solved, attempted or revisit.", status)
            }

            // === SERVER MESSAGES ===
            Message::ServerStarting(addr) => format!("BTech Buddy listening on http://{}", addr),
            Message::ServerShuttingDown => "Shutting down...".to_string(),
            Message::ServerStopped => "Server stopped".to_string(),
            Message::SecretKeyGenerated(path) => {
                format!("BUDDY_SECRET_KEY is not set, generated a session key at {}", path)
            }
            Message::SecretKeyInvalid => "Stored session key is unreadable".to_string(),
            Message::SessionsPurged(count) => format!("Removed {} expired session(s)", count),
            Message::RequestFailed(error) => format!("Request failed: {}", error),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Data exported to {}", path),
            Message::ExportCsvNeedsSingleSet => "CSV holds one table; pick tasks, attendance or practice, or use --format json".to_string(),

            // === DATABASE MESSAGES ===
            Message::DbConnectionFailed(error) => format!("Failed to open database: {}", error),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::InvalidInput(detail) => format!("Invalid input: {}", detail),
        };

        write!(f, "{}", text)
    }
}
