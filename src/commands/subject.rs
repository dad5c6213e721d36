use super::Context;
use crate::{
    db::subjects::Subjects,
    libs::{config::Config, messages::Message, subject::NewSubject, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct SubjectArgs {
    #[command(subcommand)]
    command: SubjectCommand,
}

#[derive(Debug, Subcommand)]
enum SubjectCommand {
    /// Add a subject
    Add {
        name: String,
        #[arg(short, long)]
        code: Option<String>,
        #[arg(long, default_value_t = 0)]
        credits: i64,
        /// Attendance target in percent (defaults to the configured target)
        #[arg(short, long)]
        target: Option<f64>,
    },
    /// List subjects
    List,
    /// Delete a subject with its timetable and attendance
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(ctx: &Context, args: SubjectArgs) -> Result<()> {
    let db = ctx.open()?;
    let user = ctx.user(&db.conn)?;
    let subjects = Subjects::new(&db.conn, user.id);

    match args.command {
        SubjectCommand::Add {
            name,
            code,
            credits,
            target,
        } => {
            let target = match target {
                Some(target) => target,
                None => Config::read()?.attendance_config().default_target,
            };
            let subject = subjects.create(NewSubject {
                name,
                code,
                credits,
                target_attendance: target,
            })?;
            msg_success!(Message::SubjectCreated(subject.label()));
        }
        SubjectCommand::List => {
            let list = subjects.list()?;
            if list.is_empty() {
                msg_info!(Message::SubjectsNotFound);
                return Ok(());
            }
            msg_print!(Message::SubjectsHeader, true);
            View::subjects(&list)?;
        }
        SubjectCommand::Delete { id, yes } => {
            let subject = subjects.get(id)?;
            let confirmed = yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmDeleteSubject(subject.label()).to_string())
                    .default(false)
                    .interact()?;
            if !confirmed {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            subjects.delete(id)?;
            msg_success!(Message::SubjectDeleted(id));
        }
    }

    Ok(())
}
