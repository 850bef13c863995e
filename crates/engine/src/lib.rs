//! Expense ledger of the budget organizer.
//!
//! A chat owns one [`ExpensesData`] document: its [`Budget`] and one
//! [`DayBucket`] of expenses per calendar day. The ledger operations live on
//! the document itself, the [`ExpenseStore`] persists it and a [`Converter`]
//! turns foreign-currency expenses into the budget currency.

pub use budget::{Budget, BudgetInterval};
pub use calendar::{YearMonth, parse_date};
pub use convert::{Converter, convert_for_budget};
pub use currency::Currency;
pub use error::EngineError;
pub use expenses::{Amount, DayBucket, Expense, ExpensePayload, ExpensesData};
pub use ledger::RunningBalance;
pub use money::Money;
pub use store::ExpenseStore;

mod budget;
mod calendar;
mod convert;
mod currency;
mod error;
mod expenses;
mod ledger;
mod money;
mod store;

pub type ResultEngine<T> = Result<T, EngineError>;
