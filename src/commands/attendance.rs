use super::Context;
use crate::{
    db::attendance::Attendance,
    libs::{
        attendance::{parse_date, AttendanceStatus, NewAttendance},
        messages::Message,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct AttendanceArgs {
    #[command(subcommand)]
    command: AttendanceCommand,
}

#[derive(Debug, Subcommand)]
enum AttendanceCommand {
    /// Mark a class as attended or missed. Marking the same day again replaces it.
    Mark {
        /// Subject ID
        subject: i64,
        /// present (p) or absent (a)
        status: AttendanceStatus,
        /// Class date, YYYY-MM-DD or "today"
        #[arg(short, long, default_value = "today")]
        date: String,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Per-subject percentages with safe absences / classes needed
    Summary,
    /// Recent records, optionally for one subject
    List {
        #[arg(short, long)]
        subject: Option<i64>,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Delete a record
    Delete { id: i64 },
}

pub fn cmd(ctx: &Context, args: AttendanceArgs) -> Result<()> {
    let db = ctx.open()?;
    let user = ctx.user(&db.conn)?;
    let attendance = Attendance::new(&db.conn, user.id);

    match args.command {
        AttendanceCommand::Mark {
            subject,
            status,
            date,
            note,
        } => {
            let record = attendance.mark(NewAttendance {
                subject_id: subject,
                class_date: parse_date(&date)?,
                status,
                note,
            })?;
            msg_success!(Message::AttendanceMarked {
                subject: record.subject_name,
                date: record.class_date,
                status: record.status.to_string(),
            });

            let summary = attendance.subject_summary(subject)?;
            msg_info!(summary.stats.guidance());
        }
        AttendanceCommand::Summary => {
            let summary = attendance.summary()?;
            if summary.is_empty() {
                msg_info!(Message::SubjectsNotFound);
                return Ok(());
            }
            msg_print!(Message::AttendanceSummaryHeader, true);
            View::attendance_summary(&summary)?;
        }
        AttendanceCommand::List { subject, limit } => {
            let mut records = match subject {
                Some(id) => attendance.for_subject(id)?,
                None => attendance.recent(limit)?,
            };
            records.truncate(limit);
            if records.is_empty() {
                msg_info!(Message::NoAttendanceRecords);
                return Ok(());
            }
            msg_print!(Message::AttendanceRecentHeader, true);
            View::attendance_records(&records)?;
        }
        AttendanceCommand::Delete { id } => {
            attendance.delete(id)?;
            msg_success!(Message::AttendanceRecordDeleted(id));
        }
    }

    Ok(())
}
