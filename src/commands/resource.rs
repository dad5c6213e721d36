use super::Context;
use crate::{
    db::resources::Resources,
    libs::{messages::Message, resource::NewResource, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
enum ResourceCommand {
    /// Save a link
    Add {
        url: String,
        #[arg(short, long, default_value = "")]
        title: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        /// Subject ID
        #[arg(short, long)]
        subject: Option<i64>,
    },
    /// List resources, optionally only those with a tag
    List {
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Tags in use with their resource counts
    Tags,
    /// Delete a resource
    Delete { id: i64 },
}

pub fn cmd(ctx: &Context, args: ResourceArgs) -> Result<()> {
    let db = ctx.open()?;
    let user = ctx.user(&db.conn)?;
    let resources = Resources::new(&db.conn, user.id);

    match args.command {
        ResourceCommand::Add {
            url,
            title,
            tags,
            subject,
        } => {
            let mut resource = NewResource::new(&title, &url).with_tags(&tags);
            resource.subject_id = subject;
            let resource = resources.add(resource)?;
            msg_success!(Message::ResourceAdded(resource.title));
        }
        ResourceCommand::List { tag } => {
            let (list, header) = match tag {
                Some(tag) => (resources.with_tag(&tag)?, Message::ResourcesWithTagHeader(tag)),
                None => (resources.list()?, Message::ResourcesHeader),
            };
            if list.is_empty() {
                msg_info!(Message::ResourcesNotFound);
                return Ok(());
            }
            msg_print!(header, true);
            View::resources(&list)?;
        }
        ResourceCommand::Tags => {
            let tags = resources.tags()?;
            if tags.is_empty() {
                msg_info!(Message::NoTagsFound);
                return Ok(());
            }
            msg_print!(Message::TagsHeader, true);
            View::tags(&tags)?;
        }
        ResourceCommand::Delete { id } => {
            resources.delete(id)?;
            msg_success!(Message::ResourceDeleted(id));
        }
    }

    Ok(())
}
