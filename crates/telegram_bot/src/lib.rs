//! Telegram bot.
//!
//! The bot owns no logic of its own: every text message is handed to the
//! [`Router`], which reads and writes the chat ledger, and the reply it
//! produces is sent back.

use std::sync::Arc;

use teloxide::{prelude::*, utils::command::BotCommands};

pub use exchange::{CurrencyBeacon, DEFAULT_BASE_URL};
pub use router::{IgnoreReason, Inbound, Outcome, Router};

mod commands;
mod exchange;
mod handlers;
mod parsing;
mod router;
mod ui;

const STARTUP_NOTICE: &str = "🚀 Budget organizer has been started";

#[derive(Clone)]
pub struct ConfigParameters {
    router: Arc<Router<CurrencyBeacon>>,
}

pub struct Bot {
    token: String,
    router: Arc<Router<CurrencyBeacon>>,
    notify_chat_id: Option<i64>,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);

        if let Err(err) = bot.set_my_commands(commands::BotMenu::bot_commands()).await {
            tracing::warn!("failed to publish the command menu: {err}");
        }

        if let Some(chat_id) = self.notify_chat_id
            && let Err(err) = bot.send_message(ChatId(chat_id), STARTUP_NOTICE).await
        {
            tracing::warn!("failed to send the startup notice to chat {chat_id}: {err}");
        }

        let parameters = ConfigParameters {
            router: Arc::clone(&self.router),
        };

        let handler =
            dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::debug!("Unhandled update: {:?}", upd.id);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default)]
pub struct BotBuilder {
    token: String,
    router: Option<Router<CurrencyBeacon>>,
    notify_chat_id: Option<i64>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn router(mut self, router: Router<CurrencyBeacon>) -> BotBuilder {
        self.router = Some(router);
        self
    }

    /// Chat that receives a notice every time the bot starts.
    pub fn notify_chat_id(mut self, chat_id: Option<i64>) -> BotBuilder {
        self.notify_chat_id = chat_id;
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.trim().is_empty() {
            return Err("telegram token is empty".to_string());
        }
        let router = self
            .router
            .ok_or_else(|| "telegram bot needs a router".to_string())?;

        Ok(Bot {
            token: self.token,
            router: Arc::new(router),
            notify_chat_id: self.notify_chat_id,
        })
    }
}
