use crate::clock::Clock;
use crate::data::birthday_store::BirthdayStore;
use crate::models::data::BirthdayRecord;
use crate::models::domain::{BotReply, ReplyEmbed};
use crate::res::colors::{EMBED_COLOR_NEXT, EMBED_COLOR_WARNING};
use crate::usecase::birth_list_usecase::sort_by_calendar;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct BirthNextUsecase {
    store: Arc<BirthdayStore>,
    clock: Arc<dyn Clock>,
}

/// Record with the fewest days until its next occurrence. On a tie the one that
/// comes first in calendar order wins.
pub fn next_birthday(
    mut records: Vec<BirthdayRecord>,
    today: NaiveDate,
) -> Option<(BirthdayRecord, i64)> {
    sort_by_calendar(&mut records);
    records
        .into_iter()
        .filter_map(|record| {
            let days = record.birth.days_until(today)?;
            Some((record, days))
        })
        .min_by_key(|(_, days)| *days)
}

impl BirthNextUsecase {
    pub fn new(store: Arc<BirthdayStore>, clock: Arc<dyn Clock>) -> Self {
        BirthNextUsecase { store, clock }
    }

    pub async fn invoke(&self, server_id: &str) -> anyhow::Result<BotReply> {
        let records = self.store.list_by_server(server_id).await;

        let Some((record, days)) = next_birthday(records, self.clock.today()) else {
            return Ok(BotReply::embed(ReplyEmbed::new(
                "⚠️ No upcoming birthdays!",
                EMBED_COLOR_WARNING,
            )));
        };

        Ok(BotReply::embed(
            ReplyEmbed::new("🎉 Next Birthday", EMBED_COLOR_NEXT)
                .description(format!("{} - {}", record.mention(), record.birth))
                .field("Days until birthday", days.to_string())
                .timestamped(),
        ))
    }
}
