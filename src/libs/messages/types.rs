/// Every user-facing message in the application.
///
/// The text lives in `display.rs`; callers only ever name a variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigParseError(String),
    ConfigModuleServer,
    ConfigModuleSession,
    ConfigModuleAttendance,
    PromptSelectModules,
    PromptServerHost,
    PromptServerPort,
    PromptSessionTtl,
    PromptCookieName,
    PromptDefaultTarget,

    // === USER MESSAGES ===
    UserCreated(String),   // email
    UserDeleted(String),   // email
    UserNotFound(String),  // email
    UserRequired,
    UsersNotFound,
    UsersHeader,
    PasswordChanged(String), // email
    PromptUserName,
    PromptPassword,
    PromptPasswordConfirm,
    PasswordsDoNotMatch,
    ConfirmDeleteUser(String), // email

    // === AUTHENTICATION MESSAGES ===
    NameRequired,
    NotAuthenticated,

    // === SUBJECT MESSAGES ===
    SubjectCreated(String),
    SubjectDeleted(i64),
    SubjectNotFound(i64),
    SubjectsNotFound,
    SubjectsHeader,
    ConfirmDeleteSubject(String),
    InvalidTarget(f64),
    InvalidCredits(i64),

    // === TIMETABLE MESSAGES ===
    TimetableEntryAdded(String), // weekday
    TimetableEntryDeleted(i64),
    TimetableEntryNotFound(i64),
    TimetableEmpty(String), // weekday
    TimetableHeader(String), // weekday
    InvalidTime(String),
    InvalidTimeRange(String, String),
    InvalidWeekday(String),

    // === ATTENDANCE MESSAGES ===
    AttendanceMarked {
        subject: String,
        date: String,
        status: String,
    },
    AttendanceRecordDeleted(i64),
    AttendanceRecordNotFound(i64),
    AttendanceSummaryHeader,
    AttendanceRecentHeader,
    NoAttendanceRecords,
    AttendanceNoData,
    InvalidAttendanceStatus(String),
    InvalidDate(String),

    // === TASK MESSAGES ===
    TaskCreated(String),
    TaskDeleted(i64),
    TaskNotFound(i64),
    TaskMarkedDone(i64),
    TaskReopened(i64),
    TasksNotFound,
    TasksHeader(String), // filter
    TitleRequired,

    // === RESOURCE MESSAGES ===
    ResourceAdded(String),
    ResourceDeleted(i64),
    ResourceNotFound(i64),
    ResourcesNotFound,
    ResourcesHeader,
    ResourcesWithTagHeader(String),
    TagsHeader,
    NoTagsFound,
    UrlRequired,
    InvalidUrl(String),

    // === PRACTICE LOG MESSAGES ===
    PracticeLogged(String), // problem
    PracticeEntryDeleted(i64),
    PracticeEntryNotFound(i64),
    PracticeLogEmpty,
    PracticeHeader,
    PracticeStats {
        total: usize,
        streak: usize,
    },
    PlatformRequired,
    ProblemRequired,
    InvalidPracticeStatus(String),

    // === SERVER MESSAGES ===
    ServerStarting(String), // address
    ServerShuttingDown,
    ServerStopped,
    SecretKeyGenerated(String), // path
    SecretKeyInvalid,
    SessionsPurged(usize),
    RequestFailed(String),

    // === EXPORT MESSAGES ===
    ExportCompleted(String), // path
    ExportCsvNeedsSingleSet,

    // === DATABASE MESSAGES ===
    DbConnectionFailed(String),

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,

    // === GENERAL MESSAGES ===
    OperationCancelled,
    InvalidInput(String),
}
