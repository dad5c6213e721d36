use super::Context;
use crate::{
    db::tasks::Tasks,
    libs::{
        messages::Message,
        task::{NewTask, Priority, TaskFilter},
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

const UPCOMING_LIMIT: usize = 50;

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Add a task
    Add {
        title: String,
        /// Subject ID
        #[arg(short, long)]
        subject: Option<i64>,
        /// Due date, YYYY-MM-DD or YYYY-MM-DDTHH:MM
        #[arg(short, long)]
        due: Option<String>,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },
    /// List tasks: todo, done or all
    List {
        #[arg(default_value = "todo")]
        show: TaskFilter,
        /// Only open tasks due in the next N days, plus undated ones
        #[arg(long)]
        upcoming: Option<i64>,
    },
    /// Mark a task as done
    Done { id: i64 },
    /// Move a task back to todo
    Undo { id: i64 },
    /// Delete a task
    Delete { id: i64 },
}

pub fn cmd(ctx: &Context, args: TaskArgs) -> Result<()> {
    let db = ctx.open()?;
    let user = ctx.user(&db.conn)?;
    let tasks = Tasks::new(&db.conn, user.id);

    match args.command {
        TaskCommand::Add {
            title,
            subject,
            due,
            priority,
        } => {
            let task = tasks.insert(NewTask {
                title,
                subject_id: subject,
                due_at: due,
                priority: Priority::parse_lossy(&priority),
            })?;
            msg_success!(Message::TaskCreated(task.title));
        }
        TaskCommand::List { show, upcoming } => {
            let list = match upcoming {
                Some(days) => tasks.upcoming(Local::now().date_naive(), days, UPCOMING_LIMIT)?,
                None => tasks.fetch(show)?,
            };
            if list.is_empty() {
                msg_info!(Message::TasksNotFound);
                return Ok(());
            }
            msg_print!(Message::TasksHeader(show.as_str().to_string()), true);
            View::tasks(&list)?;
        }
        TaskCommand::Done { id } => {
            tasks.set_done(id, true)?;
            msg_success!(Message::TaskMarkedDone(id));
        }
        TaskCommand::Undo { id } => {
            tasks.set_done(id, false)?;
            msg_success!(Message::TaskReopened(id));
        }
        TaskCommand::Delete { id } => {
            tasks.delete(id)?;
            msg_success!(Message::TaskDeleted(id));
        }
    }

    Ok(())
}
