use super::Context;
use crate::{
    db::timetable::Timetable,
    libs::{
        messages::Message,
        timetable::{parse_weekday, today_index, weekday_name, NewTimetableEntry},
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TimetableArgs {
    #[command(subcommand)]
    command: TimetableCommand,
}

#[derive(Debug, Subcommand)]
enum TimetableCommand {
    /// Add a weekly class
    Add {
        /// Subject ID
        subject: i64,
        /// Weekday: 0-6 (Monday is 0) or a name such as "mon"
        day: String,
        /// Start time, HH:MM
        start: String,
        /// End time, HH:MM
        end: String,
        #[arg(short, long)]
        location: Option<String>,
    },
    /// Show one day (today by default) or the whole week
    List {
        day: Option<String>,
        #[arg(short, long, conflicts_with = "day")]
        week: bool,
    },
    /// Delete a class
    Delete { id: i64 },
}

pub fn cmd(ctx: &Context, args: TimetableArgs) -> Result<()> {
    let db = ctx.open()?;
    let user = ctx.user(&db.conn)?;
    let timetable = Timetable::new(&db.conn, user.id);

    match args.command {
        TimetableCommand::Add {
            subject,
            day,
            start,
            end,
            location,
        } => {
            let day_of_week = parse_weekday(&day)?;
            timetable.add(NewTimetableEntry {
                subject_id: subject,
                day_of_week,
                start_time: start,
                end_time: end,
                location,
            })?;
            msg_success!(Message::TimetableEntryAdded(weekday_name(day_of_week).to_string()));
        }
        TimetableCommand::List { week: true, .. } => {
            let entries = timetable.week()?;
            if entries.is_empty() {
                msg_info!(Message::TimetableEmpty("any day".to_string()));
                return Ok(());
            }
            View::timetable(&entries, true)?;
        }
        TimetableCommand::List { day, week: false } => {
            let day = match day {
                Some(day) => parse_weekday(&day)?,
                None => today_index(),
            };
            let entries = timetable.for_day(day)?;
            if entries.is_empty() {
                msg_info!(Message::TimetableEmpty(weekday_name(day).to_string()));
                return Ok(());
            }
            msg_print!(Message::TimetableHeader(weekday_name(day).to_string()), true);
            View::timetable(&entries, false)?;
        }
        TimetableCommand::Delete { id } => {
            timetable.delete(id)?;
            msg_success!(Message::TimetableEntryDeleted(id));
        }
    }

    Ok(())
}
