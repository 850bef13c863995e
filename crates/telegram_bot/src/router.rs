//! Turns inbound chat messages into ledger operations and reply texts.
//!
//! The router knows nothing about Telegram: it receives the chat id, the
//! sender username and the text, and returns an [`Outcome`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use engine::{
    Budget, Converter, EngineError, ExpensePayload, ExpenseStore, ExpensesData, ResultEngine,
    YearMonth, convert_for_budget,
};

use crate::{
    parsing::{Command, parse_command},
    ui,
};

/// A text message as delivered by the chat transport.
#[derive(Clone, Copy, Debug)]
pub struct Inbound<'a> {
    pub chat_id: i64,
    pub username: Option<&'a str>,
    pub text: &'a str,
}

/// Result of dispatching one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Send this text back to the chat.
    Reply(String),
    /// Send nothing.
    Ignored(IgnoreReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Sender is not in the allow-list.
    NotAllowed,
    /// Text is neither a command nor an expense.
    Unmatched,
}

pub struct Router<C> {
    store: ExpenseStore,
    converter: C,
    timezone: Tz,
    allowed_usernames: Vec<String>,
    default_budget: Option<Budget>,
}

impl<C: Converter> Router<C> {
    pub fn new(store: ExpenseStore, converter: C, timezone: Tz) -> Self {
        Self {
            store,
            converter,
            timezone,
            allowed_usernames: Vec::new(),
            default_budget: None,
        }
    }

    /// Usernames allowed to talk to the bot, with or without the leading `@`.
    /// An empty list lets nobody in.
    pub fn allowed_usernames(mut self, usernames: Vec<String>) -> Self {
        self.allowed_usernames = usernames
            .into_iter()
            .map(|name| name.trim().trim_start_matches('@').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        self
    }

    /// Budget given to chats that record an expense without having a
    /// document yet. Without it such chats get a "not found" reply.
    pub fn default_budget(mut self, budget: Option<Budget>) -> Self {
        self.default_budget = budget;
        self
    }

    fn is_allowed(&self, username: Option<&str>) -> bool {
        let Some(username) = username else {
            return false;
        };
        self.allowed_usernames
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(username))
    }

    pub async fn dispatch(&self, inbound: Inbound<'_>, now: DateTime<Utc>) -> Outcome {
        if !self.is_allowed(inbound.username) {
            tracing::warn!(
                "dropping message from {:?} in chat {}: not allowed",
                inbound.username,
                inbound.chat_id
            );
            return Outcome::Ignored(IgnoreReason::NotAllowed);
        }

        let Some(command) = parse_command(inbound.text) else {
            tracing::debug!("no command in message of chat {}", inbound.chat_id);
            return Outcome::Ignored(IgnoreReason::Unmatched);
        };

        let now = now.with_timezone(&self.timezone);
        let chat_id = inbound.chat_id;
        let result = match command {
            Command::Balance => self.balance(chat_id, &now),
            Command::Today => self.today(chat_id, &now),
            Command::Month => self.month(chat_id, &now),
            Command::Undo => self.undo(chat_id, &now).await,
            Command::Help => Ok(ui::help_text()),
            Command::RecordExpense(payload) => self.record(chat_id, payload, &now).await,
        };

        match result {
            Ok(reply) => Outcome::Reply(reply),
            Err(EngineError::KeyNotFound(key)) => {
                tracing::info!("chat {chat_id}: {key} not found");
                Outcome::Reply(ui::not_found_text().to_string())
            }
            Err(err) => {
                tracing::error!("chat {chat_id}: command failed: {err}");
                Outcome::Reply(ui::failure_text().to_string())
            }
        }
    }

    fn require(&self, chat_id: i64) -> ResultEngine<ExpensesData> {
        self.store
            .load(chat_id)?
            .ok_or_else(|| EngineError::KeyNotFound(format!("ledger of chat {chat_id}")))
    }

    fn balance(&self, chat_id: i64, now: &DateTime<Tz>) -> ResultEngine<String> {
        let data = self.require(chat_id)?;
        let symbol = data.budget()?.symbol;
        let balance = data.running_balance(now.date_naive())?;
        Ok(ui::render_balance(&balance, symbol))
    }

    fn today(&self, chat_id: i64, now: &DateTime<Tz>) -> ResultEngine<String> {
        let data = self.require(chat_id)?;
        let budget = *data.budget()?;
        let today = now.date_naive();
        let Some(bucket) = data.bucket(today) else {
            return Ok(ui::nothing_today_text().to_string());
        };
        let remaining = data.remaining_in_interval(today)?;
        Ok(ui::render_today(
            today,
            bucket,
            budget.symbol,
            budget.interval,
            remaining,
        ))
    }

    fn month(&self, chat_id: i64, now: &DateTime<Tz>) -> ResultEngine<String> {
        let data = self.require(chat_id)?;
        let symbol = data.budget()?.symbol;
        let month = YearMonth::of(now.date_naive());
        if !data.has_month(month) {
            return Ok(ui::nothing_in_month_text(month));
        }
        let spent = data.total_for_month(month)?;
        let available = data.available_budget(now.date_naive())?;
        let remaining = data.remaining_in_month(month)?;
        Ok(ui::render_month(month, symbol, spent, available, remaining))
    }

    async fn undo(&self, chat_id: i64, now: &DateTime<Tz>) -> ResultEngine<String> {
        let _guard = self.store.lock(chat_id).await;
        let mut data = self.require(chat_id)?;
        let today = now.date_naive();

        let Some(expense) = data.undo_last(today) else {
            return Ok(ui::nothing_to_undo_text().to_string());
        };
        self.store.save(chat_id, &data)?;
        tracing::info!("chat {chat_id}: removed {} {}", expense.to.amount, expense.to.symbol);

        Ok(ui::render_undo(&expense, data.total_for_date(today)))
    }

    async fn record(
        &self,
        chat_id: i64,
        payload: ExpensePayload,
        now: &DateTime<Tz>,
    ) -> ResultEngine<String> {
        let _guard = self.store.lock(chat_id).await;
        let mut data = match (self.store.load(chat_id)?, self.default_budget) {
            (Some(data), _) => data,
            (None, Some(budget)) => {
                tracing::info!("chat {chat_id}: starting a new ledger");
                ExpensesData::new(chat_id, budget)
            }
            (None, None) => {
                return Err(EngineError::KeyNotFound(format!("ledger of chat {chat_id}")));
            }
        };
        let budget = *data.budget()?;

        let converted = convert_for_budget(&self.converter, &payload, &budget).await?;
        let expense = data.record_expense(payload, converted, now)?;

        // The reply is built before saving, so a failure here leaves the file untouched.
        let today = now.date_naive();
        let reply = ui::render_recorded(
            &expense,
            budget.interval,
            data.total_for_date(today),
            data.remaining_in_interval(today)?,
        );

        self.store.save(chat_id, &data)?;
        tracing::info!(
            "chat {chat_id}: recorded {} {} as {} {}",
            expense.from.amount,
            expense.from.symbol,
            expense.to.amount,
            expense.to.symbol
        );

        Ok(reply)
    }
}
