use engine::{Currency, ExpensePayload, Money};

/// Every message the bot reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Balance,
    Today,
    Month,
    Undo,
    Help,
    RecordExpense(ExpensePayload),
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a chat message into a [`Command`].
///
/// Slash commands are tried first, in this order: `/balance`, `/today`,
/// `/month`, `/undo` (plus `/help` and `/start`). A `@botname` suffix is
/// ignored. Anything else must look like `<amount> <currency> [description]`:
///
/// - `12.50 usd lunch` => 12.50 USD, "lunch"
/// - `8,5 BRL` => 8.50 BRL, no description
///
/// Returns `None` for everything that matches neither form.
pub fn parse_command(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix('/') {
        let token = rest.split_whitespace().next().unwrap_or("");
        let name = token.split('@').next().unwrap_or("").to_ascii_lowercase();
        return match name.as_str() {
            "balance" => Some(Command::Balance),
            "today" => Some(Command::Today),
            "month" => Some(Command::Month),
            "undo" => Some(Command::Undo),
            "help" | "start" => Some(Command::Help),
            _ => None,
        };
    }

    parse_expense(trimmed).map(Command::RecordExpense)
}

fn parse_expense(input: &str) -> Option<ExpensePayload> {
    let mut tokens = input.split_whitespace();
    let amount = tokens.next()?.parse::<Money>().ok()?;
    if amount.is_negative() || amount.is_zero() {
        return None;
    }

    let symbol = Currency::try_from(tokens.next()?).ok()?;

    let description = collapse_whitespace(&tokens.collect::<Vec<_>>().join(" "));

    Some(ExpensePayload {
        symbol,
        amount,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(input: &str) -> ExpensePayload {
        match parse_command(input) {
            Some(Command::RecordExpense(payload)) => payload,
            other => panic!("expected an expense, got {other:?}"),
        }
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_command("/balance"), Some(Command::Balance));
        assert_eq!(parse_command(" /today "), Some(Command::Today));
        assert_eq!(parse_command("/month"), Some(Command::Month));
        assert_eq!(parse_command("/undo"), Some(Command::Undo));
        assert_eq!(parse_command("/start"), Some(Command::Help));
    }

    #[test]
    fn slash_commands_ignore_bot_mention_and_case() {
        assert_eq!(parse_command("/today@budget_bot"), Some(Command::Today));
        assert_eq!(parse_command("/UNDO"), Some(Command::Undo));
    }

    #[test]
    fn unknown_slash_command_is_unmatched() {
        assert_eq!(parse_command("/export"), None);
        assert_eq!(parse_command("/"), None);
    }

    #[test]
    fn expense_with_description() {
        let payload = expense("12.50 usd  lunch   with   Ana");
        assert_eq!(payload.amount, Money::new(1250));
        assert_eq!(payload.symbol, Currency::USD);
        assert_eq!(payload.description, "lunch with Ana");
    }

    #[test]
    fn expense_without_description() {
        let payload = expense("8,5 BRL");
        assert_eq!(payload.amount, Money::new(850));
        assert_eq!(payload.symbol, Currency::BRL);
        assert!(payload.description.is_empty());
    }

    #[test]
    fn rejects_malformed_expenses() {
        assert_eq!(parse_command("hello there"), None);
        assert_eq!(parse_command("12"), None);
        assert_eq!(parse_command("12 dollars"), None);
        assert_eq!(parse_command("12 U$D"), None);
        assert_eq!(parse_command("0 BRL"), None);
        assert_eq!(parse_command("-5 BRL refund"), None);
        assert_eq!(parse_command("1.234 BRL"), None);
    }
}
