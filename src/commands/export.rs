//! Data export for backup and analysis in other tools.

use super::Context;
use crate::libs::export::{ExportData, ExportFormat, Exporter};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Which records to export. `all` needs `--format json`.
    #[arg(value_enum, default_value = "all")]
    data: ExportData,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: ExportFormat,

    /// Output file. Defaults to `buddy_<data>_<timestamp>.<ext>` in the
    /// current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(ctx: &Context, args: ExportArgs) -> Result<()> {
    let db = ctx.open()?;
    let user = ctx.user(&db.conn)?;

    Exporter::new(args.format, args.data, args.output).export(&db.conn, user.id)
}
