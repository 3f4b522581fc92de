use crate::clock::Clock;
use crate::usecase::birth_notify_usecase::BirthNotifyUsecase;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Run `task` right away and then once every `period`, forever.
pub async fn run_every<F, Fut>(period: Duration, mut task: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    // 遅れた分をまとめて実行しない
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        task().await;
    }
}

pub struct BirthdaySweepWorker;

impl BirthdaySweepWorker {
    /// Sweep once at startup so a birthday today is not missed, then every `period`.
    pub async fn run(
        birth_notify_usecase: Arc<BirthNotifyUsecase>,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) {
        tracing::info!(period_secs = period.as_secs(), "Birthday sweep worker started");
        run_every(period, || {
            let usecase = birth_notify_usecase.clone();
            let today = clock.today();
            async move {
                usecase.invoke(today).await;
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::data::birthday_store::BirthdayStore;
    use crate::data::guild_gateway::GuildGateway;
    use crate::data::memory_backend::MemoryBackend;
    use crate::models::domain::{BotReply, MonthDay};
    use chrono::NaiveDate;
    use poise::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_every_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let handle = tokio::spawn(run_every(Duration::from_secs(3600), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(2 * 3600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);

        handle.abort();
    }

    struct CountingGateway(AtomicUsize);

    #[async_trait]
    impl GuildGateway for CountingGateway {
        async fn announcement_channel(&self, server_id: &str) -> anyhow::Result<String> {
            Ok(format!("chan-{server_id}"))
        }

        async fn send(&self, _channel_id: &str, _reply: &BotReply) -> anyhow::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn startup_sweep_announces_todays_birthday() {
        let store = Arc::new(BirthdayStore::load(Arc::new(MemoryBackend::new())).await);
        store
            .upsert("u1", "s1", MonthDay::new(10, 19).unwrap())
            .await
            .unwrap();
        let gateway = Arc::new(CountingGateway(AtomicUsize::new(0)));
        let usecase = Arc::new(BirthNotifyUsecase::new(store, gateway.clone()));
        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));

        let handle = tokio::spawn(BirthdaySweepWorker::run(
            usecase,
            clock,
            Duration::from_secs(3600),
        ));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(gateway.0.load(Ordering::SeqCst), 1);

        // 同じ日の次の巡回では再通知しない
        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(gateway.0.load(Ordering::SeqCst), 1);

        handle.abort();
    }
}
