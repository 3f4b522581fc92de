//! Text command routing: `!addbirthday`, `!removebirthday`, `!birthdays`,
//! `!nextbirthday` and `!help`.
//!
//! User mistakes come back as usage replies. Storage failures are logged and
//! answered with a generic failure so a command never looks successful when it
//! was not saved.

use crate::clock::Clock;
use crate::data::birthday_store::BirthdayStore;
use crate::models::domain::{BirthdayCommand, BotReply, CommandInvocation, ReplyEmbed};
use crate::res::colors::{EMBED_COLOR_ERROR, EMBED_COLOR_HELP, EMBED_COLOR_WARNING};
use crate::usecase::birth_add_usecase::BirthAddUsecase;
use crate::usecase::birth_list_usecase::BirthListUsecase;
use crate::usecase::birth_next_usecase::BirthNextUsecase;
use crate::usecase::birth_remove_usecase::BirthRemoveUsecase;
use std::sync::Arc;

pub const ADD_BIRTHDAY: &str = "addbirthday";
pub const REMOVE_BIRTHDAY: &str = "removebirthday";
pub const LIST_BIRTHDAYS: &str = "birthdays";
pub const NEXT_BIRTHDAY: &str = "nextbirthday";
pub const HELP: &str = "help";

pub struct CommandRouter {
    prefix: String,
    birth_add_usecase: BirthAddUsecase,
    birth_remove_usecase: BirthRemoveUsecase,
    birth_list_usecase: BirthListUsecase,
    birth_next_usecase: BirthNextUsecase,
}

fn is_mention(token: &str) -> bool {
    token.starts_with("<@") && token.ends_with('>')
}

impl CommandRouter {
    pub fn new(prefix: impl Into<String>, store: Arc<BirthdayStore>, clock: Arc<dyn Clock>) -> Self {
        let prefix = prefix.into();
        CommandRouter {
            birth_add_usecase: BirthAddUsecase::new(store.clone(), prefix.clone()),
            birth_remove_usecase: BirthRemoveUsecase::new(store.clone()),
            birth_list_usecase: BirthListUsecase::new(store.clone()),
            birth_next_usecase: BirthNextUsecase::new(store, clock),
            prefix,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `None` when the message is not addressed to the bot.
    pub fn parse(&self, invocation: &CommandInvocation) -> Option<BirthdayCommand> {
        let rest = invocation.raw_text.trim_start().strip_prefix(&self.prefix)?;
        let mut tokens = rest.split_whitespace();
        let name = tokens.next()?.to_lowercase();
        let mut args = tokens.filter(|token| !is_mention(token));

        // メンションがあればその人、なければ実行者が対象
        let target = invocation
            .mentioned_user_ids
            .first()
            .unwrap_or(&invocation.caller_id)
            .clone();

        let command = match name.as_str() {
            ADD_BIRTHDAY => BirthdayCommand::Add {
                target,
                date: args.next().map(str::to_string),
            },
            REMOVE_BIRTHDAY => BirthdayCommand::Remove { target },
            LIST_BIRTHDAYS => BirthdayCommand::List,
            NEXT_BIRTHDAY => BirthdayCommand::Next,
            HELP => BirthdayCommand::Help,
            _ => BirthdayCommand::Unknown(name),
        };
        Some(command)
    }

    /// Parse and run a prefixed message. `None` when the message is not a command.
    pub async fn handle(&self, invocation: &CommandInvocation) -> Option<BotReply> {
        let command = self.parse(invocation)?;
        Some(
            self.dispatch(command, invocation.server_id.as_deref())
                .await,
        )
    }

    pub async fn dispatch(&self, command: BirthdayCommand, server_id: Option<&str>) -> BotReply {
        match &command {
            BirthdayCommand::Help => return self.help(),
            BirthdayCommand::Unknown(name) => return self.unknown(name),
            _ => {}
        }

        let Some(server_id) = server_id else {
            return BotReply::embed(ReplyEmbed::new(
                "⚠️ Birthday commands only work inside a server",
                EMBED_COLOR_WARNING,
            ));
        };

        let result = match &command {
            BirthdayCommand::Add { target, date } => {
                self.birth_add_usecase
                    .invoke(server_id, target, date.as_deref())
                    .await
            }
            BirthdayCommand::Remove { target } => {
                self.birth_remove_usecase.invoke(server_id, target).await
            }
            BirthdayCommand::List => self.birth_list_usecase.invoke(server_id).await,
            BirthdayCommand::Next => self.birth_next_usecase.invoke(server_id).await,
            BirthdayCommand::Help | BirthdayCommand::Unknown(_) => return self.help(),
        };

        result.unwrap_or_else(|e| {
            tracing::error!(server_id, ?command, error = %e, "Birthday command failed");
            BotReply::embed(
                ReplyEmbed::new("🚨 Something went wrong", EMBED_COLOR_ERROR)
                    .description("The change could not be saved. Please try again later."),
            )
        })
    }

    pub fn help(&self) -> BotReply {
        let p = &self.prefix;
        BotReply::embed(
            ReplyEmbed::new("🎂 Birthday Bot Commands", EMBED_COLOR_HELP)
                .field(format!("{p}{ADD_BIRTHDAY} MM/DD"), "Add your own birthday")
                .field(
                    format!("{p}{ADD_BIRTHDAY} @user MM/DD"),
                    "Add someone else's birthday",
                )
                .field(format!("{p}{REMOVE_BIRTHDAY}"), "Remove your birthday")
                .field(
                    format!("{p}{REMOVE_BIRTHDAY} @user"),
                    "Remove someone else's birthday",
                )
                .field(format!("{p}{LIST_BIRTHDAYS}"), "List all birthdays")
                .field(format!("{p}{NEXT_BIRTHDAY}"), "Show the next upcoming birthday")
                .field(format!("{p}{HELP}"), "Show this help message")
                .timestamped(),
        )
    }

    fn unknown(&self, name: &str) -> BotReply {
        let p = &self.prefix;
        BotReply::embed(
            ReplyEmbed::new("⚠️ Unknown command", EMBED_COLOR_WARNING)
                .description(format!("`{p}{name}` is not a command. Type `{p}{HELP}` for the list.")),
        )
    }
}
