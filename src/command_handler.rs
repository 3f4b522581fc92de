use crate::models::common::{Data, Error};
use crate::models::domain::CommandInvocation;
use serenity::all::{Context, FullEvent, Message};

fn invocation_from(message: &Message) -> CommandInvocation {
    CommandInvocation {
        raw_text: message.content.clone(),
        caller_id: message.author.id.to_string(),
        server_id: message.guild_id.map(|id| id.to_string()),
        mentioned_user_ids: message
            .mentions
            .iter()
            .map(|user| user.id.to_string())
            .collect(),
        channel_id: message.channel_id.to_string(),
    }
}

/// Feeds prefixed text messages to the router and posts its reply.
pub async fn event_handler(
    _ctx: &Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot } => {
            tracing::info!(
                user = %data_about_bot.user.tag(),
                guilds = data_about_bot.guilds.len(),
                prefix = data.router.prefix(),
                "Logged in"
            );
        }
        FullEvent::Message { new_message } => {
            if new_message.author.bot {
                return Ok(());
            }
            let invocation = invocation_from(new_message);
            if let Some(reply) = data.router.handle(&invocation).await {
                // 送信失敗でハンドラを落とさない
                if let Err(e) = data.gateway.send(&invocation.channel_id, &reply).await {
                    tracing::error!(
                        channel_id = %invocation.channel_id,
                        error = %e,
                        "Failed to send command reply"
                    );
                }
            }
        }
        _ => {}
    }
    Ok(())
}
