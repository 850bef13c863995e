use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Budget, Currency, Money};

/// An amount tagged with its currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub symbol: Currency,
    pub amount: Money,
}

impl Amount {
    #[must_use]
    pub const fn new(symbol: Currency, amount: Money) -> Self {
        Self { symbol, amount }
    }
}

/// What the user typed: `<amount> <symbol> [description]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpensePayload {
    pub symbol: Currency,
    pub amount: Money,
    pub description: String,
}

/// A recorded expense. `to` is `from` converted into the budget currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unix seconds.
    pub timestamp: i64,
    pub from: Amount,
    pub to: Amount,
    #[serde(default)]
    pub description: String,
}

/// Expenses of one calendar day, in insertion order.
///
/// `total` is always the sum of `items[..].to.amount`; both are only changed
/// together through the ledger operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    #[serde(default)]
    pub(crate) items: Vec<Expense>,
    #[serde(default)]
    pub(crate) total: Money,
}

impl DayBucket {
    #[must_use]
    pub fn items(&self) -> &[Expense] {
        &self.items
    }

    #[must_use]
    pub fn total(&self) -> Money {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The whole ledger of one chat, as stored in `expenses_<chatId>.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensesData {
    pub chat_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(default)]
    pub(crate) expenses: BTreeMap<NaiveDate, DayBucket>,
}

impl ExpensesData {
    /// An empty ledger for a chat.
    #[must_use]
    pub fn new(chat_id: i64, budget: Budget) -> Self {
        Self {
            chat_id,
            budget: Some(budget),
            expenses: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn bucket(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.expenses.get(&date)
    }

    /// Buckets ordered by date.
    pub fn buckets(&self) -> impl Iterator<Item = (&NaiveDate, &DayBucket)> {
        self.expenses.iter()
    }
}
