//! Reply texts. Everything here is sent with the HTML parse mode.

use chrono::NaiveDate;
use engine::{
    Amount, BudgetInterval, Currency, DayBucket, Expense, Money, RunningBalance, YearMonth,
};
use teloxide::utils::command::BotCommands;

use crate::commands::BotMenu;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn money(amount: Money, symbol: Currency) -> String {
    format!("{amount} {symbol}")
}

fn amount(value: &Amount) -> String {
    money(value.amount, value.symbol)
}

fn interval_scope(interval: BudgetInterval) -> &'static str {
    match interval {
        BudgetInterval::Daily => "today",
        BudgetInterval::Monthly => "this month",
    }
}

fn expense_line(expense: &Expense) -> String {
    let mut line = if expense.from.symbol == expense.to.symbol {
        amount(&expense.to)
    } else {
        format!("{} → {}", amount(&expense.from), amount(&expense.to))
    };
    if !expense.description.is_empty() {
        line.push_str(" · ");
        line.push_str(&escape(&expense.description));
    }
    line
}

pub(crate) fn render_recorded(
    expense: &Expense,
    interval: BudgetInterval,
    spent_today: Money,
    remaining: Money,
) -> String {
    let symbol = expense.to.symbol;
    format!(
        "💸 <b>Spent</b>\n{}\n\n📅 <b>Today:</b> {}\n💰 <b>Available {}:</b> {}",
        expense_line(expense),
        money(spent_today, symbol),
        interval_scope(interval),
        money(remaining, symbol)
    )
}

pub(crate) fn render_today(
    date: NaiveDate,
    bucket: &DayBucket,
    symbol: Currency,
    interval: BudgetInterval,
    remaining: Money,
) -> String {
    let items = bucket
        .items()
        .iter()
        .map(|item| format!("• {}", expense_line(item)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "📅 <b>{date}</b>\n{items}\n\n💸 <b>Total:</b> {}\n💰 <b>Available {}:</b> {}",
        money(bucket.total(), symbol),
        interval_scope(interval),
        money(remaining, symbol)
    )
}

pub(crate) fn render_month(
    month: YearMonth,
    symbol: Currency,
    spent: Money,
    available: Money,
    remaining: Money,
) -> String {
    format!(
        "🗓 <b>{month}</b>\n💸 <b>Spent:</b> {}\n🎯 <b>Budget:</b> {}\n💰 <b>Remaining:</b> {}",
        money(spent, symbol),
        money(available, symbol),
        money(remaining, symbol)
    )
}

pub(crate) fn render_balance(balance: &RunningBalance, symbol: Currency) -> String {
    format!(
        "⚖️ <b>Balance</b>\n⏳ <b>{}(s):</b> {}\n💸 <b>Spent:</b> {}\n💰 <b>Remaining:</b> {}",
        balance.unit_label(),
        balance.elapsed,
        money(balance.spent, symbol),
        money(balance.remaining, symbol)
    )
}

pub(crate) fn render_undo(expense: &Expense, spent_today: Money) -> String {
    format!(
        "↩️ <b>Removed</b>\n{}\n\n📅 <b>Today:</b> {}",
        expense_line(expense),
        money(spent_today, expense.to.symbol)
    )
}

pub(crate) fn not_found_text() -> &'static str {
    "No budget found for this chat."
}

pub(crate) fn nothing_today_text() -> &'static str {
    "No expenses recorded today."
}

pub(crate) fn nothing_in_month_text(month: YearMonth) -> String {
    format!("No expenses recorded in {month}.")
}

pub(crate) fn nothing_to_undo_text() -> &'static str {
    "Nothing to undo today."
}

pub(crate) fn failure_text() -> &'static str {
    "⚠️ Something went wrong, nothing was changed. Please try again later."
}

pub(crate) fn help_text() -> String {
    format!(
        "{}\n\nTo record an expense send <code>amount currency [description]</code>, e.g. <code>12.50 USD lunch</code>.",
        escape(&BotMenu::descriptions().to_string())
    )
}
