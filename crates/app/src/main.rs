use chrono_tz::Tz;
use engine::ExpenseStore;
use telegram_bot::{CurrencyBeacon, Router};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budget_organizer={level},telegram_bot={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let timezone: Tz = settings
        .organizer
        .timezone
        .parse()
        .map_err(|err| format!("invalid timezone {}: {err}", settings.organizer.timezone))?;
    let store = ExpenseStore::new(&settings.organizer.database);
    tracing::info!(
        "Ledgers stored in {} ({timezone})",
        store.root().display()
    );

    if let Some(server) = settings.server {
        let state = server::ServerState::new(store.clone(), timezone);
        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, server.port);
            server::run(state, &addr).await;
        });
    }

    if let Some(telegram) = settings.telegram {
        if telegram.allowed_usernames.is_empty() {
            tracing::warn!("telegram.allowed_usernames is empty: every message will be dropped");
        }
        if settings.currency_beacon.api_key.is_empty() {
            tracing::warn!("currency_beacon.api_key is empty: conversions will fail");
        }

        let converter = CurrencyBeacon::new(
            reqwest::Client::new(),
            &settings.currency_beacon.base_url,
            &settings.currency_beacon.api_key,
        );
        let router = Router::new(store, converter, timezone)
            .allowed_usernames(telegram.allowed_usernames)
            .default_budget(settings.organizer.budget);

        tasks.spawn(async move {
            tracing::info!("Found telegram settings...");
            match telegram_bot::Bot::builder()
                .token(&telegram.token)
                .router(router)
                .notify_chat_id(telegram.notify_chat_id)
                .build()
            {
                Ok(bot) => bot.run().await,
                Err(err) => tracing::error!("failed to initialize telegram bot: {err}"),
            }
        });
    }

    if tasks.is_empty() {
        tracing::warn!("Neither [server] nor [telegram] is configured, nothing to run");
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}
