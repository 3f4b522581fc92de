use crate::data::birthday_store::BirthdayStore;
use crate::models::domain::{BotReply, MonthDay, ReplyEmbed};
use crate::res::colors::{EMBED_COLOR_ERROR, EMBED_COLOR_SUCCESS};
use crate::usecase::command_router::ADD_BIRTHDAY;
use std::sync::Arc;

pub struct BirthAddUsecase {
    store: Arc<BirthdayStore>,
    prefix: String,
}

impl BirthAddUsecase {
    pub fn new(store: Arc<BirthdayStore>, prefix: impl Into<String>) -> Self {
        BirthAddUsecase {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn usage(&self) -> BotReply {
        let prefix = &self.prefix;
        BotReply::embed(
            ReplyEmbed::new("🚨 That date doesn't look right", EMBED_COLOR_ERROR).description(
                format!(
                    "Please use the format: `{prefix}{ADD_BIRTHDAY} MM/DD` or `{prefix}{ADD_BIRTHDAY} @user MM/DD`"
                ),
            ),
        )
    }

    pub async fn invoke(
        &self,
        server_id: &str,
        target: &str,
        date: Option<&str>,
    ) -> anyhow::Result<BotReply> {
        // 日付の入力フォーマットが無効ならストアには触れない
        let Some(Ok(birth)) = date.map(str::parse::<MonthDay>) else {
            return Ok(self.usage());
        };

        self.store.upsert(target, server_id, birth).await?;
        tracing::info!(server_id, user_id = target, %birth, "Birthday saved");

        Ok(BotReply::embed(
            ReplyEmbed::new("✅ Birthday saved", EMBED_COLOR_SUCCESS)
                .description(format!("Birthday added for <@{target}> on {birth}!")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory_backend::MemoryBackend;

    async fn usecase() -> (Arc<MemoryBackend>, Arc<BirthdayStore>, BirthAddUsecase) {
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(BirthdayStore::load(backend.clone()).await);
        let usecase = BirthAddUsecase::new(store.clone(), "!");
        (backend, store, usecase)
    }

    #[tokio::test]
    async fn valid_date_is_saved_and_confirmed() {
        let (_backend, store, usecase) = usecase().await;

        let reply = usecase.invoke("s1", "u1", Some("02/09")).await.unwrap();

        assert_eq!(reply.title(), Some("✅ Birthday saved"));
        let description = reply.embed.unwrap().description.unwrap();
        assert!(description.contains("<@u1>"));
        assert!(description.contains("2/9"));
        assert_eq!(store.list_by_server("s1").await[0].birth, MonthDay::new(2, 9).unwrap());
    }

    #[tokio::test]
    async fn invalid_or_missing_date_replies_usage_without_mutation() {
        let (_backend, store, usecase) = usecase().await;

        for date in [Some("13/01"), Some("00/15"), Some("5/32"), Some("tomorrow"), None] {
            let reply = usecase.invoke("s1", "u1", date).await.unwrap();
            assert_eq!(reply, usecase.usage(), "{date:?}");
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn usage_mentions_the_configured_prefix() {
        let (_backend, store, _usecase) = usecase().await;
        let usecase = BirthAddUsecase::new(store, "?");

        let description = usecase.usage().embed.unwrap().description.unwrap();

        assert!(description.contains("`?addbirthday MM/DD`"));
    }

    #[tokio::test]
    async fn storage_failure_is_propagated() {
        let (backend, store, usecase) = usecase().await;
        backend.fail_writes(true);

        assert!(usecase.invoke("s1", "u1", Some("1/1")).await.is_err());
        assert!(store.is_empty().await);
    }
}
