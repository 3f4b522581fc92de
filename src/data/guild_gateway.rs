use crate::constants::FALLBACK_ANNOUNCEMENT_CHANNEL;
use crate::models::domain::BotReply;
use anyhow::{anyhow, Context as _};
use poise::async_trait;
use serenity::all::{ChannelId, ChannelType, GuildId, Http};
use std::num::NonZeroU64;
use std::sync::Arc;

/// Outbound side of the chat platform: where to announce, and how to post.
#[async_trait]
pub trait GuildGateway: Send + Sync {
    /// Channel that birthday announcements for `server_id` go to.
    async fn announcement_channel(&self, server_id: &str) -> anyhow::Result<String>;

    async fn send(&self, channel_id: &str, reply: &BotReply) -> anyhow::Result<()>;
}

pub struct SerenityGuildGateway {
    http: Arc<Http>,
}

impl SerenityGuildGateway {
    pub fn new(http: Arc<Http>) -> Self {
        SerenityGuildGateway { http }
    }
}

fn parse_id(kind: &str, raw: &str) -> anyhow::Result<NonZeroU64> {
    raw.parse::<NonZeroU64>()
        .with_context(|| format!("invalid {kind} id {raw:?}"))
}

/// System channel if the server has one, else the first text channel named
/// `general`.
fn pick_announcement_channel<'a>(
    guild_id: GuildId,
    system_channel: Option<ChannelId>,
    channels: impl IntoIterator<Item = (ChannelId, ChannelType, &'a str)>,
) -> anyhow::Result<ChannelId> {
    if let Some(channel_id) = system_channel {
        return Ok(channel_id);
    }
    channels
        .into_iter()
        .find(|(_, kind, name)| {
            *kind == ChannelType::Text && *name == FALLBACK_ANNOUNCEMENT_CHANNEL
        })
        .map(|(id, _, _)| id)
        .ok_or_else(|| {
            anyhow!(
                "guild {} has no system channel and no #{} text channel",
                guild_id,
                FALLBACK_ANNOUNCEMENT_CHANNEL
            )
        })
}

#[async_trait]
impl GuildGateway for SerenityGuildGateway {
    async fn announcement_channel(&self, server_id: &str) -> anyhow::Result<String> {
        let guild_id = GuildId::from(parse_id("guild", server_id)?);
        let guild = self.http.get_guild(guild_id).await?;

        // システムチャンネルが無いサーバーは #general にフォールバック
        let channels = match guild.system_channel_id {
            Some(_) => Default::default(),
            None => guild_id.channels(&self.http).await?,
        };
        let channel_id = pick_announcement_channel(
            guild_id,
            guild.system_channel_id,
            channels
                .values()
                .map(|ch| (ch.id, ch.kind, ch.name.as_str())),
        )?;
        Ok(channel_id.to_string())
    }

    async fn send(&self, channel_id: &str, reply: &BotReply) -> anyhow::Result<()> {
        let channel_id = ChannelId::from(parse_id("channel", channel_id)?);
        channel_id
            .send_message(&*self.http, reply.to_message())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild() -> GuildId {
        GuildId::new(1)
    }

    #[test]
    fn system_channel_wins() {
        let picked = pick_announcement_channel(
            guild(),
            Some(ChannelId::new(7)),
            [(ChannelId::new(8), ChannelType::Text, "general")],
        )
        .unwrap();
        assert_eq!(picked, ChannelId::new(7));
    }

    #[test]
    fn falls_back_to_general_text_channel() {
        let picked = pick_announcement_channel(
            guild(),
            None,
            [
                (ChannelId::new(2), ChannelType::Voice, "general"),
                (ChannelId::new(3), ChannelType::Text, "random"),
                (ChannelId::new(4), ChannelType::Text, "general"),
            ],
        )
        .unwrap();
        assert_eq!(picked, ChannelId::new(4));
    }

    #[test]
    fn neither_channel_is_an_error() {
        let result = pick_announcement_channel(
            guild(),
            None,
            [(ChannelId::new(3), ChannelType::Text, "random")],
        );
        assert!(result.unwrap_err().to_string().contains("#general"));
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        assert!(parse_id("guild", "abc").is_err());
        assert!(parse_id("guild", "0").is_err());
        assert_eq!(parse_id("guild", "42").unwrap().get(), 42);
    }
}
