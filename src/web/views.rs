//! Server-rendered pages.
//!
//! Pages are assembled with `format!` into a shared [`layout`]. Everything
//! that came from a user goes through [`escape`].

use crate::libs::attendance::{AttendanceHealth, AttendanceRecord, SubjectAttendance};
use crate::libs::formatter::{format_percentage, or_dash};
use crate::libs::practice::{PracticeEntry, PracticeStats};
use crate::libs::resource::Resource;
use crate::libs::subject::Subject;
use crate::libs::task::{Task, TaskFilter};
use crate::libs::timetable::{weekday_name, TimetableEntry, WEEKDAYS};
use crate::libs::user::User;
use axum::http::StatusCode;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:0 auto;padding:1rem}\
nav a{margin-right:.8rem}table{border-collapse:collapse;width:100%;margin:.5rem 0}\
td,th{border-bottom:1px solid #ddd;padding:.3rem;text-align:left}\
.error{background:#fdd;border:1px solid #c00;padding:.5rem}.done{color:#888;text-decoration:line-through}\
.at-risk{color:#c00}.on-track{color:#080}form.inline{display:inline}";

/// Escapes text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn opt(value: Option<&str>) -> String {
    escape(&or_dash(value))
}

/// Wraps a page body with the document head, navigation and error banner.
pub fn layout(title: &str, user: Option<&User>, error: Option<&str>, body: &str) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset='utf-8'>\n<title>{} · BTech Buddy</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape(title),
        STYLE
    ));

    match user {
        Some(user) => html.push_str(&format!(
            "<nav><a href='/dashboard'>Dashboard</a><a href='/subjects'>Subjects</a><a href='/timetable'>Timetable</a>\
             <a href='/attendance'>Attendance</a><a href='/tasks'>Tasks</a><a href='/resources'>Resources</a>\
             <a href='/coding'>Coding</a>\n<span>{}</span>\n\
             <form class='inline' action='/logout' method='post'><button>Log out</button></form></nav>\n",
            escape(&user.name)
        )),
        None => html.push_str("<nav><a href='/login'>Log in</a><a href='/register'>Register</a></nav>\n"),
    }

    html.push_str(&format!("<h1>{}</h1>\n", escape(title)));
    if let Some(error) = error {
        html.push_str(&format!("<p class='error'>{}</p>\n", escape(error)));
    }
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    layout(title, None, Some(message), "<p><a href='/'>Back to the start page</a></p>\n")
}

pub fn login_page(error: Option<&str>, email: &str) -> String {
    let body = format!(
        "<form action='/login' method='post'>\n\
         <label>Email <input type='email' name='email' value='{}' required></label>\n\
         <label>Password <input type='password' name='password' required></label>\n\
         <button>Log in</button>\n</form>\n\
         <p>No account yet? <a href='/register'>Register</a></p>\n",
        escape(email)
    );
    layout("Log in", None, error, &body)
}

pub fn register_page(error: Option<&str>, name: &str, email: &str) -> String {
    let body = format!(
        "<form action='/register' method='post'>\n\
         <label>Name <input name='name' value='{}' required></label>\n\
         <label>Email <input type='email' name='email' value='{}' required></label>\n\
         <label>Password <input type='password' name='password' minlength='6' required></label>\n\
         <button>Create account</button>\n</form>\n\
         <p>Already registered? <a href='/login'>Log in</a></p>\n",
        escape(name),
        escape(email)
    );
    layout("Register", None, error, &body)
}

/// What the dashboard shows.
pub struct Dashboard {
    pub today: String,
    pub weekday: u8,
    pub classes: Vec<TimetableEntry>,
    pub tasks: Vec<Task>,
    pub attendance: Vec<SubjectAttendance>,
}

pub fn dashboard_page(user: &User, data: &Dashboard) -> String {
    let mut body = format!(
        "<p>Hello, {}. Today is {} ({}).</p>\n<h2>Today's classes</h2>\n",
        escape(&user.name),
        weekday_name(data.weekday),
        data.today
    );
    if data.classes.is_empty() {
        body.push_str("<p>No classes today.</p>\n");
    } else {
        body.push_str(&class_table(&data.classes));
    }

    body.push_str("<h2>Upcoming tasks</h2>\n");
    if data.tasks.is_empty() {
        body.push_str("<p>Nothing due in the next 7 days.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Title</th><th>Subject</th><th>Due</th><th>Priority</th></tr>\n");
        for task in &data.tasks {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&task.title),
                opt(task.subject_name.as_deref()),
                opt(task.due_at.as_deref()),
                task.priority
            ));
        }
        body.push_str("</table>\n<p><a href='/tasks'>All tasks</a></p>\n");
    }

    body.push_str("<h2>Attendance</h2>\n");
    body.push_str(&attendance_table(&data.attendance));
    layout("Dashboard", Some(user), None, &body)
}

fn class_table(entries: &[TimetableEntry]) -> String {
    let mut html = String::from("<table>\n<tr><th>Time</th><th>Subject</th><th>Location</th></tr>\n");
    for entry in entries {
        html.push_str(&format!(
            "<tr><td>{} - {}</td><td>{}</td><td>{}</td></tr>\n",
            entry.start_time,
            entry.end_time,
            escape(&entry.subject_name),
            opt(entry.location.as_deref())
        ));
    }
    html.push_str("</table>\n");
    html
}

fn attendance_table(summary: &[SubjectAttendance]) -> String {
    if summary.is_empty() {
        return "<p>No subjects yet. <a href='/subjects'>Add one</a>.</p>\n".to_string();
    }

    let mut html = String::from(
        "<table>\n<tr><th>Subject</th><th>Present</th><th>Total</th><th>Attendance</th><th>Target</th><th>Status</th></tr>\n",
    );
    for subject in summary {
        let stats = &subject.stats;
        let class = match stats.health {
            AttendanceHealth::AtRisk => "at-risk",
            AttendanceHealth::OnTrack => "on-track",
            AttendanceHealth::NoData => "",
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.0}%</td><td class='{}'>{}</td></tr>\n",
            escape(&subject.subject_name),
            stats.present,
            stats.total(),
            format_percentage(stats.percentage),
            stats.target,
            class,
            escape(&stats.guidance())
        ));
    }
    html.push_str("</table>\n");
    html
}

/// `<option>`s for a subject picker. `blank` adds a leading "none" choice.
fn subject_options(subjects: &[Subject], blank: bool) -> String {
    let mut html = String::new();
    if blank {
        html.push_str("<option value=''>(none)</option>");
    }
    for subject in subjects {
        html.push_str(&format!("<option value='{}'>{}</option>", subject.id, escape(&subject.label())));
    }
    html
}

fn delete_button(action: &str, field: &str, id: i64, extra: &str) -> String {
    format!(
        "<form class='inline' action='{}' method='post'><input type='hidden' name='{}' value='{}'>{}<button>Delete</button></form>",
        action, field, id, extra
    )
}

pub fn subjects_page(user: &User, subjects: &[Subject], default_target: f64, error: Option<&str>) -> String {
    let mut body = String::new();
    if subjects.is_empty() {
        body.push_str("<p>No subjects yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Code</th><th>Name</th><th>Credits</th><th>Target</th><th></th></tr>\n");
        for subject in subjects {
            body.push_str(&format!(
                "<tr><form action='/subjects/update' method='post'>\
                 <input type='hidden' name='subject_id' value='{id}'>\
                 <td><input name='code' value='{code}' size='8'></td>\
                 <td><input name='name' value='{name}' required></td>\
                 <td><input type='number' name='credits' min='0' value='{credits}' size='3'></td>\
                 <td><input type='number' name='target_attendance' min='0' max='100' step='0.1' value='{target}' size='4'></td>\
                 <td><button>Save</button></form>{delete}</td></tr>\n",
                id = subject.id,
                code = escape(subject.code.as_deref().unwrap_or_default()),
                name = escape(&subject.name),
                credits = subject.credits,
                target = subject.target_attendance,
                delete = delete_button("/subjects/delete", "subject_id", subject.id, ""),
            ));
        }
        body.push_str("</table>\n");
    }

    body.push_str(&format!(
        "<h2>Add subject</h2>\n<form action='/subjects/add' method='post'>\n\
         <input name='name' placeholder='Name' required>\n<input name='code' placeholder='Code'>\n\
         <input type='number' name='credits' min='0' placeholder='Credits'>\n\
         <input type='number' name='target_attendance' min='0' max='100' step='0.1' value='{}'>\n\
         <button>Add</button>\n</form>\n",
        default_target
    ));
    layout("Subjects", Some(user), error, &body)
}

pub fn timetable_page(user: &User, day: u8, entries: &[TimetableEntry], subjects: &[Subject], error: Option<&str>) -> String {
    let mut body = String::from("<p>");
    for (index, name) in WEEKDAYS.iter().enumerate() {
        if usize::from(day) == index {
            body.push_str(&format!("<strong>{}</strong> ", name));
        } else {
            body.push_str(&format!("<a href='/timetable?day={}'>{}</a> ", index, name));
        }
    }
    body.push_str("</p>\n");

    if entries.is_empty() {
        body.push_str(&format!("<p>No classes on {}.</p>\n", weekday_name(day)));
    } else {
        body.push_str("<table>\n<tr><th>Time</th><th>Subject</th><th>Location</th><th></th></tr>\n");
        let keep_day = format!("<input type='hidden' name='back' value='{}'>", day);
        for entry in entries {
            body.push_str(&format!(
                "<tr><td>{} - {}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                entry.start_time,
                entry.end_time,
                escape(&entry.subject_name),
                opt(entry.location.as_deref()),
                delete_button("/timetable/delete", "entry_id", entry.id, &keep_day)
            ));
        }
        body.push_str("</table>\n");
    }

    if subjects.is_empty() {
        body.push_str("<p><a href='/subjects'>Add a subject</a> before building the timetable.</p>\n");
    } else {
        body.push_str(&format!(
            "<h2>Add class</h2>\n<form action='/timetable/add' method='post'>\n\
             <input type='hidden' name='day_of_week' value='{}'>\n\
             <select name='subject_id' required>{}</select>\n\
             <input type='time' name='start_time' required>\n<input type='time' name='end_time' required>\n\
             <input name='location' placeholder='Room'>\n<button>Add</button>\n</form>\n",
            day,
            subject_options(subjects, false)
        ));
    }
    layout("Timetable", Some(user), error, &body)
}

pub fn attendance_page(
    user: &User,
    summary: &[SubjectAttendance],
    records: &[AttendanceRecord],
    subjects: &[Subject],
    today: &str,
    error: Option<&str>,
) -> String {
    let mut body = attendance_table(summary);

    if !subjects.is_empty() {
        body.push_str(&format!(
            "<h2>Mark attendance</h2>\n<form action='/attendance/mark' method='post'>\n\
             <select name='subject_id' required>{}</select>\n\
             <input type='date' name='class_date' value='{}'>\n\
             <select name='status'><option value='present'>Present</option><option value='absent'>Absent</option></select>\n\
             <input name='note' placeholder='Note'>\n<button>Mark</button>\n</form>\n",
            subject_options(subjects, false),
            today
        ));
    }

    body.push_str("<h2>Recent records</h2>\n");
    if records.is_empty() {
        body.push_str("<p>No attendance marked yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Date</th><th>Subject</th><th>Status</th><th>Note</th><th></th></tr>\n");
        for record in records {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                record.class_date,
                escape(&record.subject_name),
                record.status,
                opt(record.note.as_deref()),
                delete_button("/attendance/delete", "record_id", record.id, "")
            ));
        }
        body.push_str("</table>\n");
    }
    layout("Attendance", Some(user), error, &body)
}

pub fn tasks_page(user: &User, show: TaskFilter, tasks: &[Task], subjects: &[Subject], error: Option<&str>) -> String {
    let mut body = String::from("<p>");
    for filter in [TaskFilter::Todo, TaskFilter::Done, TaskFilter::All] {
        if filter == show {
            body.push_str(&format!("<strong>{}</strong> ", filter.as_str()));
        } else {
            body.push_str(&format!("<a href='/tasks?show={0}'>{0}</a> ", filter.as_str()));
        }
    }
    body.push_str("</p>\n");

    if tasks.is_empty() {
        body.push_str("<p>No tasks here.</p>\n");
    } else {
        let keep_show = format!("<input type='hidden' name='show' value='{}'>", show.as_str());
        let back = format!("<input type='hidden' name='back' value='{}'>", show.as_str());
        body.push_str("<table>\n<tr><th></th><th>Title</th><th>Subject</th><th>Due</th><th>Priority</th><th></th></tr>\n");
        for task in tasks {
            let (next, label) = if task.is_done() { ("todo", "Reopen") } else { ("done", "Done") };
            let class = if task.is_done() { " class='done'" } else { "" };
            body.push_str(&format!(
                "<tr><td><form class='inline' action='/tasks/toggle' method='post'>\
                 <input type='hidden' name='task_id' value='{id}'><input type='hidden' name='next_status' value='{next}'>{keep}\
                 <button>{label}</button></form></td>\
                 <td{class}>{title}</td><td>{subject}</td><td>{due}</td><td>{priority}</td><td>{delete}</td></tr>\n",
                id = task.id,
                next = next,
                keep = keep_show,
                label = label,
                class = class,
                title = escape(&task.title),
                subject = opt(task.subject_name.as_deref()),
                due = opt(task.due_at.as_deref()),
                priority = task.priority,
                delete = delete_button("/tasks/delete", "task_id", task.id, &back),
            ));
        }
        body.push_str("</table>\n");
    }

    body.push_str(&format!(
        "<h2>Add task</h2>\n<form action='/tasks/add' method='post'>\n\
         <input name='title' placeholder='Title' required>\n\
         <select name='subject_id'>{}</select>\n\
         <input type='datetime-local' name='due_at'>\n\
         <select name='priority'><option value='low'>low</option><option value='medium' selected>medium</option>\
         <option value='high'>high</option></select>\n<button>Add</button>\n</form>\n",
        subject_options(subjects, true)
    ));
    layout("Tasks", Some(user), error, &body)
}

pub fn resources_page(
    user: &User,
    tag: Option<&str>,
    resources: &[Resource],
    tags: &[(String, usize)],
    subjects: &[Subject],
    error: Option<&str>,
) -> String {
    let mut body = String::new();
    if !tags.is_empty() {
        body.push_str("<p>Tags: <a href='/resources'>all</a> ");
        for (name, count) in tags {
            body.push_str(&format!(
                "<a href='/resources?tag={}'>{}</a> ({}) ",
                escape(&urlencoding::encode(name)),
                escape(name),
                count
            ));
        }
        body.push_str("</p>\n");
    }
    if let Some(tag) = tag {
        body.push_str(&format!("<p>Showing resources tagged <strong>{}</strong>.</p>\n", escape(tag)));
    }

    if resources.is_empty() {
        body.push_str("<p>No resources saved.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Title</th><th>Subject</th><th>Tags</th><th></th></tr>\n");
        for resource in resources {
            body.push_str(&format!(
                "<tr><td><a href='{}' rel='noopener noreferrer' target='_blank'>{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&resource.url),
                escape(&resource.title),
                opt(resource.subject_name.as_deref()),
                escape(&resource.tags.join(", ")),
                delete_button("/resources/delete", "resource_id", resource.id, "")
            ));
        }
        body.push_str("</table>\n");
    }

    body.push_str(&format!(
        "<h2>Add resource</h2>\n<form action='/resources/add' method='post'>\n\
         <input name='title' placeholder='Title'>\n<input type='url' name='url' placeholder='https://' required>\n\
         <select name='subject_id'>{}</select>\n<input name='tags' placeholder='tags, comma separated'>\n\
         <button>Add</button>\n</form>\n",
        subject_options(subjects, true)
    ));
    layout("Resources", Some(user), error, &body)
}

pub fn coding_page(
    user: &User,
    platform: Option<&str>,
    entries: &[PracticeEntry],
    stats: &PracticeStats,
    today: &str,
    error: Option<&str>,
) -> String {
    let mut body = format!(
        "<p>{} problems logged, current streak {} day(s).</p>\n<p>Platforms: <a href='/coding'>all</a> ",
        stats.total, stats.streak
    );
    for (name, count) in &stats.per_platform {
        body.push_str(&format!(
            "<a href='/coding?platform={}'>{}</a> ({}) ",
            escape(&urlencoding::encode(name)),
            escape(name),
            count
        ));
    }
    body.push_str("</p>\n");
    if let Some(platform) = platform {
        body.push_str(&format!("<p>Showing <strong>{}</strong> only.</p>\n", escape(platform)));
    }

    if entries.is_empty() {
        body.push_str("<p>Nothing logged yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>Date</th><th>Platform</th><th>Problem</th><th>Status</th><th>Difficulty</th><th>Topic</th><th></th></tr>\n",
        );
        for entry in entries {
            let problem = match &entry.link {
                Some(link) => format!("<a href='{}' rel='noopener noreferrer'>{}</a>", escape(link), escape(&entry.problem)),
                None => escape(&entry.problem),
            };
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                entry.log_date,
                escape(&entry.platform),
                problem,
                entry.status,
                opt(entry.difficulty.as_deref()),
                opt(entry.topic.as_deref()),
                delete_button("/coding/delete", "log_id", entry.id, "")
            ));
        }
        body.push_str("</table>\n");
    }

    body.push_str(&format!(
        "<h2>Log a problem</h2>\n<form action='/coding/add' method='post'>\n\
         <input type='date' name='log_date' value='{}'>\n<input name='platform' placeholder='Platform' required>\n\
         <input name='problem' placeholder='Problem' required>\n\
         <select name='status'><option value='solved'>solved</option><option value='attempted'>attempted</option>\
         <option value='revisit'>revisit</option></select>\n\
         <input name='difficulty' placeholder='Difficulty'>\n<input name='topic' placeholder='Topic'>\n\
         <input type='url' name='link' placeholder='Link'>\n<button>Log</button>\n</form>\n",
        today
    ));
    layout("Coding practice", Some(user), error, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_layout_escapes_error_and_user() {
        let user = User {
            id: 1,
            name: "<script>".to_string(),
            email: "a@b.c".to_string(),
            created_at: "2024-01-01T00:00:00".to_string(),
        };
        let html = layout("Tasks", Some(&user), Some("bad <input>"), "");
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("bad &lt;input&gt;"));
        assert!(html.contains("action='/logout'"));
    }

    #[test]
    fn test_filter_links_are_url_encoded() {
        let user = User {
            id: 1,
            name: "Asha".to_string(),
            email: "a@b.c".to_string(),
            created_at: String::new(),
        };
        let tags = vec![("c++".to_string(), 1), ("a&b #1".to_string(), 2)];
        let html = resources_page(&user, None, &[], &tags, &[], None);
        assert!(html.contains("href='/resources?tag=c%2B%2B'>c++</a>"));
        assert!(html.contains("href='/resources?tag=a%26b%20%231'>a&amp;b #1</a>"));

        let stats = PracticeStats {
            total: 1,
            per_platform: vec![("Code Chef".to_string(), 1)],
            streak: 0,
        };
        let html = coding_page(&user, None, &[], &stats, "2026-03-01", None);
        assert!(html.contains("href='/coding?platform=Code%20Chef'"));
    }

    #[test]
    fn test_error_page_names_status() {
        let html = error_page(StatusCode::NOT_FOUND, "Task with ID 3 not found.");
        assert!(html.contains("Not Found"));
        assert!(html.contains("Task with ID 3 not found."));
    }
}
