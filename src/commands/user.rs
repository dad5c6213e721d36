//! Account administration from the terminal.

use super::Context;
use crate::{
    db::{sessions::Sessions, users::Users},
    libs::{messages::Message, user::NewUser, view::View},
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Register a new account
    Add {
        email: String,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List registered accounts
    List,
    /// Change a password and sign out every session of the account
    Passwd { email: String },
    /// Delete an account and everything it owns
    Delete {
        email: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(ctx: &Context, args: UserArgs) -> Result<()> {
    let db = ctx.open()?;
    let users = Users::new(&db.conn);

    match args.command {
        UserCommand::Add { email, name } => {
            let name = match name {
                Some(name) => name,
                None => Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptUserName.to_string())
                    .interact_text()?,
            };
            let password = prompt_new_password()?;
            let user = users.register(NewUser::new(&name, &email, &password))?;
            msg_success!(Message::UserCreated(user.email));
        }
        UserCommand::List => {
            let list = users.list()?;
            if list.is_empty() {
                msg_info!(Message::UsersNotFound);
                return Ok(());
            }
            msg_print!(Message::UsersHeader, true);
            View::users(&list)?;
        }
        UserCommand::Passwd { email } => {
            let user = users
                .find_by_email(&email)?
                .ok_or_else(|| msg_error_anyhow!(Message::UserNotFound(email.clone())))?;
            let password = prompt_new_password()?;
            users.change_password(user.id, &password)?;
            msg_success!(Message::PasswordChanged(user.email));
        }
        UserCommand::Delete { email, yes } => {
            let user = users
                .find_by_email(&email)?
                .ok_or_else(|| msg_error_anyhow!(Message::UserNotFound(email.clone())))?;

            let confirmed = yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmDeleteUser(user.email.clone()).to_string())
                    .default(false)
                    .interact()?;
            if !confirmed {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }

            Sessions::new(&db.conn).delete_for_user(user.id)?;
            users.delete(user.id)?;
            msg_success!(Message::UserDeleted(user.email));
        }
    }

    Ok(())
}

fn prompt_new_password() -> Result<String> {
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;
    let confirmation = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPasswordConfirm.to_string())
        .interact()?;
    if password != confirmation {
        msg_bail_anyhow!(Message::PasswordsDoNotMatch);
    }
    Ok(password)
}
