//! Command menu advertised to Telegram clients.

use teloxide::utils::command::BotCommands;

/// Slash commands shown in the client menu and in `/help`.
///
/// Parsing is done by [`crate::parsing::parse_command`]; this enum only
/// carries the descriptions.
#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "Budget organizer commands:"
)]
pub enum BotMenu {
    #[command(description = "show the balance accrued since the first expense.")]
    Balance,
    #[command(description = "show today's expenses.")]
    Today,
    #[command(description = "show this month's spending.")]
    Month,
    #[command(description = "remove the last expense recorded today.")]
    Undo,
    #[command(description = "show this message.")]
    Help,
}
