use crate::data::birthday_store::BirthdayStore;
use crate::data::guild_gateway::GuildGateway;
use crate::models::data::{BirthdayKey, BirthdayRecord};
use crate::models::domain::{BotReply, MonthDay, ReplyEmbed};
use crate::res::colors::EMBED_COLOR_CELEBRATION;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub sent: usize,
    pub failed: usize,
    pub already_sent: usize,
}

pub struct BirthNotifyUsecase {
    store: Arc<BirthdayStore>,
    gateway: Arc<dyn GuildGateway>,
    // 当日すでに通知済みのメンバー（日付が変わったら破棄）
    notified: Mutex<HashSet<(BirthdayKey, NaiveDate)>>,
}

pub fn birthday_announcement(record: &BirthdayRecord) -> BotReply {
    BotReply::embed(
        ReplyEmbed::new("🎉 Happy Birthday! 🎂", EMBED_COLOR_CELEBRATION)
            .description(format!("It's {}'s birthday today! 🎊", record.mention()))
            .timestamped(),
    )
    .with_content("@everyone")
}

impl BirthNotifyUsecase {
    pub fn new(store: Arc<BirthdayStore>, gateway: Arc<dyn GuildGateway>) -> Self {
        BirthNotifyUsecase {
            store,
            gateway,
            notified: Mutex::new(HashSet::new()),
        }
    }

    /// Announce every birthday falling on `today`. A failure for one record is
    /// logged and the sweep moves on to the next; failed records are retried on
    /// the next sweep of the same day.
    pub async fn invoke(&self, today: NaiveDate) -> SweepSummary {
        let due = self.store.due_today(MonthDay::from(today)).await;
        let mut notified = self.notified.lock().await;
        notified.retain(|(_, day)| *day == today);

        let mut summary = SweepSummary::default();
        for record in due {
            let key = (record.key(), today);
            if notified.contains(&key) {
                summary.already_sent += 1;
                continue;
            }

            match self.announce(&record).await {
                Ok(channel_id) => {
                    tracing::info!(
                        server_id = %record.server_id,
                        user_id = %record.user_id,
                        %channel_id,
                        "Sent birthday announcement"
                    );
                    notified.insert(key);
                    summary.sent += 1;
                }
                Err(e) => {
                    tracing::error!(
                        server_id = %record.server_id,
                        user_id = %record.user_id,
                        error = %e,
                        "Error sending birthday message"
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            %today,
            sent = summary.sent,
            failed = summary.failed,
            already_sent = summary.already_sent,
            "Birthday sweep finished"
        );
        summary
    }

    async fn announce(&self, record: &BirthdayRecord) -> anyhow::Result<String> {
        let channel_id = self
            .gateway
            .announcement_channel(&record.server_id)
            .await?;
        self.gateway
            .send(&channel_id, &birthday_announcement(record))
            .await?;
        Ok(channel_id)
    }
}
