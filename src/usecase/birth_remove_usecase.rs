use crate::data::birthday_store::BirthdayStore;
use crate::models::domain::{BotReply, ReplyEmbed};
use crate::res::colors::{EMBED_COLOR_SUCCESS, EMBED_COLOR_WARNING};
use std::sync::Arc;

pub struct BirthRemoveUsecase {
    store: Arc<BirthdayStore>,
}

impl BirthRemoveUsecase {
    pub fn new(store: Arc<BirthdayStore>) -> Self {
        BirthRemoveUsecase { store }
    }

    pub async fn invoke(&self, server_id: &str, target: &str) -> anyhow::Result<BotReply> {
        let existed = self.store.remove(target, server_id).await?;

        let reply = if existed {
            tracing::info!(server_id, user_id = target, "Birthday removed");
            ReplyEmbed::new("🗑️ Birthday removed", EMBED_COLOR_SUCCESS)
                .description(format!("Birthday removed for <@{target}>"))
        } else {
            ReplyEmbed::new("⚠️ No birthday saved", EMBED_COLOR_WARNING)
                .description(format!("There is no birthday saved for <@{target}>"))
        };
        Ok(BotReply::embed(reply))
    }
}
