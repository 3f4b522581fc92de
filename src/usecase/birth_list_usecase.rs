use crate::data::birthday_store::BirthdayStore;
use crate::models::data::BirthdayRecord;
use crate::models::domain::{BotReply, ReplyEmbed};
use crate::res::colors::{EMBED_COLOR_LIST, EMBED_COLOR_WARNING};
use std::sync::Arc;

pub struct BirthListUsecase {
    store: Arc<BirthdayStore>,
}

/// Calendar order, then user id so equal dates list the same way every time.
pub fn sort_by_calendar(records: &mut [BirthdayRecord]) {
    records.sort_by(|a, b| (a.birth, &a.user_id).cmp(&(b.birth, &b.user_id)));
}

impl BirthListUsecase {
    pub fn new(store: Arc<BirthdayStore>) -> Self {
        BirthListUsecase { store }
    }

    pub async fn invoke(&self, server_id: &str) -> anyhow::Result<BotReply> {
        let mut records = self.store.list_by_server(server_id).await;

        if records.is_empty() {
            return Ok(BotReply::embed(ReplyEmbed::new(
                "⚠️ No birthdays saved yet!",
                EMBED_COLOR_WARNING,
            )));
        }

        sort_by_calendar(&mut records);
        let lines = records
            .iter()
            .map(|record| format!("{} - {}", record.mention(), record.birth))
            .collect::<Vec<_>>();

        Ok(BotReply::embed(
            ReplyEmbed::new("🎂 Birthday List", EMBED_COLOR_LIST)
                .description(lines.join("\n"))
                .timestamped(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory_backend::MemoryBackend;
    use crate::models::domain::MonthDay;

    async fn store_with(entries: &[(&str, &str, u32, u32)]) -> Arc<BirthdayStore> {
        let store = Arc::new(BirthdayStore::load(Arc::new(MemoryBackend::new())).await);
        for (server, user, month, day) in entries {
            store
                .upsert(user, server, MonthDay::new(*month, *day).unwrap())
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn empty_server_says_none_saved() {
        let store = store_with(&[("other", "u1", 1, 1)]).await;

        let reply = BirthListUsecase::new(store).invoke("s1").await.unwrap();

        assert_eq!(reply.title(), Some("⚠️ No birthdays saved yet!"));
    }

    #[tokio::test]
    async fn lists_one_line_per_record_in_calendar_order() {
        let store = store_with(&[
            ("s1", "dec", 12, 1),
            ("s1", "jan31", 1, 31),
            ("s1", "jan2", 1, 2),
            ("s2", "elsewhere", 6, 6),
        ])
        .await;

        let reply = BirthListUsecase::new(store).invoke("s1").await.unwrap();

        assert_eq!(reply.title(), Some("🎂 Birthday List"));
        assert_eq!(
            reply.embed.unwrap().description.unwrap(),
            "<@jan2> - 1/2\n<@jan31> - 1/31\n<@dec> - 12/1"
        );
    }

    #[tokio::test]
    async fn added_birthday_shows_exactly_once() {
        let store = store_with(&[("s1", "u1", 3, 3)]).await;
        store
            .upsert("u1", "s1", MonthDay::new(4, 4).unwrap())
            .await
            .unwrap();

        let reply = BirthListUsecase::new(store).invoke("s1").await.unwrap();

        assert_eq!(reply.embed.unwrap().description.unwrap(), "<@u1> - 4/4");
    }
}
