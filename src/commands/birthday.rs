use crate::models::common::{Context, Error};
use crate::models::domain::{BirthdayCommand, BotReply, MonthDay, ReplyEmbed};
use crate::res::colors::EMBED_COLOR_ERROR;
use poise::ChoiceParameter;
use serenity::all::User;

#[derive(Debug, ChoiceParameter)]
pub enum BirthdayAction {
    Add,
    Remove,
    List,
    Next,
    Help,
}

fn add_usage() -> BotReply {
    BotReply::embed(
        ReplyEmbed::new("🚨 That date doesn't look right", EMBED_COLOR_ERROR).description(
            "Please fill in the `date` option as MM/DD, e.g. `/birthday action:Add date:04/09`",
        ),
    )
}

/// Slash options to a router command. A missing or malformed date for `Add`
/// is answered here, with usage that refers to the slash options.
fn to_command(
    action: BirthdayAction,
    target: String,
    date: Option<String>,
) -> Result<BirthdayCommand, BotReply> {
    Ok(match action {
        BirthdayAction::Add => match date {
            Some(date) if date.trim().parse::<MonthDay>().is_ok() => BirthdayCommand::Add {
                target,
                date: Some(date.trim().to_string()),
            },
            _ => return Err(add_usage()),
        },
        BirthdayAction::Remove => BirthdayCommand::Remove { target },
        BirthdayAction::List => BirthdayCommand::List,
        BirthdayAction::Next => BirthdayCommand::Next,
        BirthdayAction::Help => BirthdayCommand::Help,
    })
}

/// 誕生日コマンド
#[poise::command(slash_command, guild_only)]
pub async fn birthday(
    ctx: Context<'_>,
    #[description = "What to do"] action: BirthdayAction,
    #[description = "Birthday as MM/DD (add only)"] date: Option<String>,
    #[description = "Member to act on, defaults to you"] user: Option<User>,
) -> Result<(), Error> {
    let target = user
        .map(|user| user.id)
        .unwrap_or_else(|| ctx.author().id)
        .to_string();

    let reply = match to_command(action, target, date) {
        Ok(command) => {
            let server_id = ctx.guild_id().map(|id| id.to_string());
            ctx.data()
                .router
                .dispatch(command, server_id.as_deref())
                .await
        }
        Err(usage) => usage,
    };
    ctx.send(reply.to_poise_reply().ephemeral(true)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage_text(result: Result<BirthdayCommand, BotReply>) -> String {
        match result {
            Err(reply) => reply.embed.unwrap().description.unwrap(),
            Ok(command) => panic!("expected usage, got {command:?}"),
        }
    }

    #[test]
    fn add_without_date_explains_the_date_option() {
        let text = usage_text(to_command(BirthdayAction::Add, "u1".into(), None));
        assert!(text.contains("`date`"));
        assert!(!text.contains("!addbirthday"));
    }

    #[test]
    fn add_with_bad_date_explains_the_date_option() {
        let text = usage_text(to_command(BirthdayAction::Add, "u1".into(), Some("13/1".into())));
        assert!(text.contains("`date`"));
    }

    #[test]
    fn add_with_valid_date_goes_to_the_router() {
        let command = to_command(BirthdayAction::Add, "u1".into(), Some(" 4/9 ".into())).unwrap();
        assert_eq!(
            command,
            BirthdayCommand::Add {
                target: "u1".into(),
                date: Some("4/9".into())
            }
        );
    }

    #[test]
    fn other_actions_map_directly() {
        assert_eq!(
            to_command(BirthdayAction::Remove, "u2".into(), None).unwrap(),
            BirthdayCommand::Remove { target: "u2".into() }
        );
        assert_eq!(
            to_command(BirthdayAction::List, "u2".into(), Some("1/1".into())).unwrap(),
            BirthdayCommand::List
        );
    }
}
