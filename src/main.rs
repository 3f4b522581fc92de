use anyhow::Context as _;
use birthday_bot_rs::clock::{Clock, ZonedClock};
use birthday_bot_rs::command_handler::event_handler;
use birthday_bot_rs::commands::birthday::birthday;
use birthday_bot_rs::config::BotConfig;
use birthday_bot_rs::data::birthday_store::BirthdayStore;
use birthday_bot_rs::data::guild_gateway::{GuildGateway, SerenityGuildGateway};
use birthday_bot_rs::data::open_backend;
use birthday_bot_rs::models::common::Data;
use birthday_bot_rs::usecase::birth_notify_usecase::BirthNotifyUsecase;
use birthday_bot_rs::usecase::command_router::CommandRouter;
use birthday_bot_rs::worker::birthday_sweep_worker::BirthdaySweepWorker;
use serenity::all::{Client, GatewayIntents};
use shuttle_runtime::SecretStore;
use std::sync::Arc;

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: SecretStore,
) -> shuttle_serenity::ShuttleSerenity {
    let config = BotConfig::from_lookup(|key| secrets.get(key)).context("Invalid bot configuration")?;
    tracing::info!(?config, "Starting birthday bot");

    // 起動時に永続化層から全件読み込む（読めなければ空で続行）
    let backend = open_backend(&config.store).context("Failed to open the birthday store")?;
    let store = Arc::new(BirthdayStore::load(backend).await);
    let clock: Arc<dyn Clock> = Arc::new(ZonedClock::new(config.timezone));

    let intents = GatewayIntents::GUILDS // サーバーのシステムチャンネル取得
        | GatewayIntents::GUILD_MESSAGES // ギルド内のメッセージイベント受信権限
        | GatewayIntents::MESSAGE_CONTENT; // プレフィックスコマンドの本文

    let command_prefix = config.command_prefix.clone();
    let sweep_interval = config.sweep_interval;
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                // コマンドはここに追加
                birthday(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                let gateway: Arc<dyn GuildGateway> =
                    Arc::new(SerenityGuildGateway::new(ctx.http.clone()));

                let birth_notify_usecase =
                    Arc::new(BirthNotifyUsecase::new(store.clone(), gateway.clone()));
                tokio::spawn(BirthdaySweepWorker::run(
                    birth_notify_usecase,
                    clock.clone(),
                    sweep_interval,
                ));

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                Ok(Data {
                    router: CommandRouter::new(command_prefix, store, clock),
                    gateway,
                })
            })
        })
        .build();

    let client = Client::builder(&config.token, intents)
        .framework(framework)
        .await
        .map_err(shuttle_runtime::CustomError::new)?;

    Ok(client.into())
}
