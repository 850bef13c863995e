use serde::{Deserialize, Serialize};

use crate::{Currency, Money};

/// Recurrence unit of a budget allowance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetInterval {
    #[default]
    Daily,
    Monthly,
}

impl BudgetInterval {
    /// Label of a single interval, used in replies ("3 Day(s)").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BudgetInterval::Daily => "Day",
            BudgetInterval::Monthly => "Month",
        }
    }
}

/// Spending allowance of a chat. Configured out-of-band and never changed by
/// the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub symbol: Currency,
    pub amount: Money,
    pub interval: BudgetInterval,
}

impl Budget {
    #[must_use]
    pub const fn new(symbol: Currency, amount: Money, interval: BudgetInterval) -> Self {
        Self {
            symbol,
            amount,
            interval,
        }
    }
}
