use super::attendance::{AttendanceRecord, SubjectAttendance};
use super::formatter::{format_percentage, or_dash};
use super::practice::{PracticeEntry, PracticeStats};
use super::resource::Resource;
use super::subject::Subject;
use super::task::Task;
use super::timetable::TimetableEntry;
use super::user::User;
use anyhow::Result;
use prettytable::{row, Table};

/// Terminal tables for the CLI.
pub struct View {}

impl View {
    pub fn users(users: &[User]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "EMAIL", "REGISTERED"]);
        for user in users {
            table.add_row(row![user.id, user.name, user.email, user.created_at]);
        }
        table.printstd();

        Ok(())
    }

    pub fn subjects(subjects: &[Subject]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "CODE", "NAME", "CREDITS", "TARGET"]);
        for subject in subjects {
            let target = format!("{:.0}%", subject.target_attendance);
            table.add_row(row![
                subject.id,
                or_dash(subject.code.as_deref()),
                subject.name,
                subject.credits,
                target
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn timetable(entries: &[TimetableEntry], with_day: bool) -> Result<()> {
        let mut table = Table::new();

        if with_day {
            table.add_row(row!["ID", "DAY", "TIME", "SUBJECT", "ROOM"]);
        } else {
            table.add_row(row!["ID", "TIME", "SUBJECT", "ROOM"]);
        }
        for entry in entries {
            let time = format!("{} - {}", entry.start_time, entry.end_time);
            let room = or_dash(entry.location.as_deref());
            if with_day {
                table.add_row(row![entry.id, entry.day_name(), time, entry.subject_name, room]);
            } else {
                table.add_row(row![entry.id, time, entry.subject_name, room]);
            }
        }
        table.printstd();

        Ok(())
    }

    pub fn attendance_summary(summary: &[SubjectAttendance]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "SUBJECT", "PRESENT", "ABSENT", "ATTENDANCE", "TARGET", "STATUS", "ADVICE"]);
        for subject in summary {
            let stats = &subject.stats;
            let target = format!("{:.0}%", stats.target);
            table.add_row(row![
                subject.subject_id,
                subject.subject_name,
                stats.present,
                stats.absent,
                format_percentage(stats.percentage),
                target,
                stats.health.label(),
                stats.guidance()
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn attendance_records(records: &[AttendanceRecord]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "SUBJECT", "STATUS", "NOTE"]);
        for record in records {
            table.add_row(row![
                record.id,
                record.class_date,
                record.subject_name,
                record.status,
                or_dash(record.note.as_deref())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn tasks(tasks: &[Task]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "", "TITLE", "SUBJECT", "DUE", "PRIORITY"]);
        for task in tasks {
            let mark = if task.is_done() { "✔" } else { " " };
            table.add_row(row![
                task.id,
                mark,
                task.title,
                or_dash(task.subject_name.as_deref()),
                or_dash(task.due_at.as_deref()),
                task.priority
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn resources(resources: &[Resource]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "URL", "SUBJECT", "TAGS"]);
        for resource in resources {
            table.add_row(row![
                resource.id,
                resource.title,
                resource.url,
                or_dash(resource.subject_name.as_deref()),
                resource.tags.join(", ")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn tags(tags: &[(String, usize)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TAG", "RESOURCES"]);
        for (tag, count) in tags {
            table.add_row(row![tag, count]);
        }
        table.printstd();

        Ok(())
    }

    pub fn practice(entries: &[PracticeEntry]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "PLATFORM", "PROBLEM", "STATUS", "DIFFICULTY", "TOPIC"]);
        for entry in entries {
            table.add_row(row![
                entry.id,
                entry.log_date,
                entry.platform,
                entry.problem,
                entry.status,
                or_dash(entry.difficulty.as_deref()),
                or_dash(entry.topic.as_deref())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn practice_stats(stats: &PracticeStats) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["PLATFORM", "PROBLEMS"]);
        for (platform, count) in &stats.per_platform {
            table.add_row(row![platform, count]);
        }
        table.add_row(row!["TOTAL", stats.total]);
        table.printstd();

        Ok(())
    }
}
