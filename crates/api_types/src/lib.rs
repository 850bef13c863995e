//! JSON bodies of the read-only HTTP API.
//!
//! Amounts are major currency units (`12.5` is twelve and a half), the same
//! representation used in the stored ledger documents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod expenses {
    use super::*;

    /// One recorded expense.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        /// Unix seconds.
        pub timestamp: i64,
        pub from_symbol: String,
        pub from_amount: f64,
        pub to_symbol: String,
        pub to_amount: f64,
        pub description: String,
    }

    /// `GET /expenses/{chat_id}/{date}`
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct DaySummary {
        pub date: NaiveDate,
        /// Budget currency.
        pub symbol: String,
        pub total: f64,
        /// Allowance left in the interval containing `date`.
        pub available: f64,
        pub items: Vec<ExpenseView>,
    }

    /// `GET /expenses/{chat_id}/month/{year_month}`
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MonthSummary {
        /// `YYYY-MM`.
        pub month: String,
        pub symbol: String,
        pub total: f64,
        /// Allowance of the whole month.
        pub available: f64,
        pub remaining: f64,
    }
}

pub mod balance {
    use super::*;

    /// `GET /balance/{chat_id}`
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BalanceSummary {
        pub symbol: String,
        pub spent: f64,
        pub remaining: f64,
        /// Elapsed intervals, first recorded one included.
        pub elapsed: i64,
        /// `Day` or `Month`.
        pub unit: String,
    }
}
