use super::Context;
use crate::{
    db::practice::Practice,
    libs::{attendance::parse_date, messages::Message, practice::NewPracticeEntry, practice::PracticeStatus, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct PracticeArgs {
    #[command(subcommand)]
    command: PracticeCommand,
}

#[derive(Debug, Subcommand)]
enum PracticeCommand {
    /// Log a problem
    Add {
        platform: String,
        problem: String,
        /// solved, attempted or revisit
        #[arg(short, long, default_value = "solved")]
        status: PracticeStatus,
        /// Date, YYYY-MM-DD or "today"
        #[arg(short, long, default_value = "today")]
        date: String,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        link: Option<String>,
    },
    /// List logged problems
    List {
        #[arg(short, long)]
        platform: Option<String>,
    },
    /// Totals per platform and the current streak
    Stats,
    /// Delete an entry
    Delete { id: i64 },
}

pub fn cmd(ctx: &Context, args: PracticeArgs) -> Result<()> {
    let db = ctx.open()?;
    let user = ctx.user(&db.conn)?;
    let practice = Practice::new(&db.conn, user.id);

    match args.command {
        PracticeCommand::Add {
            platform,
            problem,
            status,
            date,
            difficulty,
            topic,
            link,
        } => {
            let mut entry = NewPracticeEntry::new(parse_date(&date)?, &platform, &problem);
            entry.status = status;
            entry.difficulty = difficulty;
            entry.topic = topic;
            entry.link = link;
            practice.add(entry)?;
            msg_success!(Message::PracticeLogged(problem));
        }
        PracticeCommand::List { platform } => {
            let entries = practice.list(platform.as_deref())?;
            if entries.is_empty() {
                msg_info!(Message::PracticeLogEmpty);
                return Ok(());
            }
            msg_print!(Message::PracticeHeader, true);
            View::practice(&entries)?;
        }
        PracticeCommand::Stats => {
            let stats = practice.stats(Local::now().date_naive())?;
            if stats.total == 0 {
                msg_info!(Message::PracticeLogEmpty);
                return Ok(());
            }
            msg_print!(
                Message::PracticeStats {
                    total: stats.total,
                    streak: stats.streak,
                },
                true
            );
            View::practice_stats(&stats)?;
        }
        PracticeCommand::Delete { id } => {
            practice.delete(id)?;
            msg_success!(Message::PracticeEntryDeleted(id));
        }
    }

    Ok(())
}
