//! Ledger operations over a chat document.
//!
//! Every operation works on an in-memory [`ExpensesData`] and a "today"
//! already resolved to the organizer timezone. Persisting the result is up to
//! the caller (see [`ExpenseStore`](crate::ExpenseStore)).

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::{
    Amount, Budget, BudgetInterval, EngineError, Expense, ExpensePayload, ExpensesData, Money,
    ResultEngine, YearMonth,
};

/// Lifetime allowance accrued since the first recorded day, minus lifetime
/// spend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunningBalance {
    pub spent: Money,
    pub remaining: Money,
    /// Elapsed days (daily budgets) or months (monthly budgets), inclusive.
    pub elapsed: i64,
    pub interval: BudgetInterval,
}

impl RunningBalance {
    #[must_use]
    pub const fn unit_label(&self) -> &'static str {
        self.interval.label()
    }
}

fn overflow() -> EngineError {
    EngineError::InvalidAmount("amount too large".to_string())
}

fn checked_sum(mut amounts: impl Iterator<Item = Money>) -> ResultEngine<Money> {
    amounts.try_fold(Money::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or_else(overflow)
    })
}

impl ExpensesData {
    /// The chat budget, or `KeyNotFound` when the document has none.
    pub fn budget(&self) -> ResultEngine<&Budget> {
        self.budget
            .as_ref()
            .ok_or_else(|| EngineError::KeyNotFound(format!("budget of chat {}", self.chat_id)))
    }

    /// Appends an expense to the bucket of `now`'s date, creating the bucket
    /// when missing.
    ///
    /// `converted` is the payload amount already expressed in the budget
    /// currency (see [`convert_for_budget`](crate::convert_for_budget)).
    pub fn record_expense(
        &mut self,
        payload: ExpensePayload,
        converted: Money,
        now: &DateTime<Tz>,
    ) -> ResultEngine<Expense> {
        let symbol = self.budget()?.symbol;
        let bucket = self.expenses.entry(now.date_naive()).or_default();
        let total = bucket.total.checked_add(converted).ok_or_else(overflow)?;

        let expense = Expense {
            timestamp: now.timestamp(),
            from: Amount::new(payload.symbol, payload.amount),
            to: Amount::new(symbol, converted),
            description: payload.description,
        };
        bucket.items.push(expense.clone());
        bucket.total = total;

        Ok(expense)
    }

    /// Removes the last expense recorded on `today`.
    ///
    /// Returns `None` when there is nothing to undo. The bucket total never
    /// goes below zero, and a bucket left without items is dropped.
    pub fn undo_last(&mut self, today: NaiveDate) -> Option<Expense> {
        let bucket = self.expenses.get_mut(&today)?;
        let expense = bucket.items.pop()?;

        bucket.total = bucket
            .total
            .checked_sub(expense.to.amount)
            .unwrap_or(Money::ZERO)
            .max(Money::ZERO);

        if bucket.items.is_empty() {
            self.expenses.remove(&today);
        }
        Some(expense)
    }

    /// Total of a single day, zero when nothing was recorded.
    #[must_use]
    pub fn total_for_date(&self, date: NaiveDate) -> Money {
        self.expenses
            .get(&date)
            .map(|bucket| bucket.total)
            .unwrap_or(Money::ZERO)
    }

    /// Sum of every bucket inside `month`.
    pub fn total_for_month(&self, month: YearMonth) -> ResultEngine<Money> {
        checked_sum(
            self.expenses
                .iter()
                .filter(|(date, _)| YearMonth::of(**date) == month)
                .map(|(_, bucket)| bucket.total),
        )
    }

    /// `true` when at least one bucket falls inside `month`.
    #[must_use]
    pub fn has_month(&self, month: YearMonth) -> bool {
        self.expenses.keys().any(|date| YearMonth::of(*date) == month)
    }

    /// Sum of every bucket ever recorded.
    pub fn lifetime_total(&self) -> ResultEngine<Money> {
        checked_sum(self.expenses.values().map(|bucket| bucket.total))
    }

    #[must_use]
    pub fn first_recorded_date(&self) -> Option<NaiveDate> {
        self.expenses.keys().next().copied()
    }

    /// Allowance ceiling of the month containing `today`.
    ///
    /// Daily budgets are scaled by the number of days of the whole calendar
    /// month, not by the days elapsed so far.
    pub fn available_budget(&self, today: NaiveDate) -> ResultEngine<Money> {
        let budget = self.budget()?;
        match budget.interval {
            BudgetInterval::Monthly => Ok(budget.amount),
            BudgetInterval::Daily => {
                let days = YearMonth::of(today).days()?;
                budget
                    .amount
                    .checked_times(i64::from(days))
                    .ok_or_else(overflow)
            }
        }
    }

    /// What is left of the allowance of the interval containing `date`: the
    /// day for daily budgets, the month for monthly ones.
    pub fn remaining_in_interval(&self, date: NaiveDate) -> ResultEngine<Money> {
        let budget = self.budget()?;
        let spent = match budget.interval {
            BudgetInterval::Daily => self.total_for_date(date),
            BudgetInterval::Monthly => self.total_for_month(YearMonth::of(date))?,
        };
        budget.amount.checked_sub(spent).ok_or_else(overflow)
    }

    /// Month allowance (see [`available_budget`](Self::available_budget))
    /// minus what was spent in `month`.
    pub fn remaining_in_month(&self, month: YearMonth) -> ResultEngine<Money> {
        let available = self.available_budget(month.first_day()?)?;
        available
            .checked_sub(self.total_for_month(month)?)
            .ok_or_else(overflow)
    }

    /// Allowance accrued since the first recorded day minus lifetime spend.
    ///
    /// Intervals are counted in calendar units and include both ends, so an
    /// expense recorded today yields `elapsed == 1`. A ledger with no buckets
    /// counts the current interval only.
    pub fn running_balance(&self, today: NaiveDate) -> ResultEngine<RunningBalance> {
        let budget = self.budget()?;
        let first = self.first_recorded_date().unwrap_or(today);

        let elapsed = match budget.interval {
            BudgetInterval::Daily => today.signed_duration_since(first).num_days() + 1,
            BudgetInterval::Monthly => {
                YearMonth::of(today).months_since(YearMonth::of(first)) + 1
            }
        }
        .max(1);

        let spent = self.lifetime_total()?;
        let remaining = budget
            .amount
            .checked_times(elapsed)
            .and_then(|allowance| allowance.checked_sub(spent))
            .ok_or_else(overflow)?;

        Ok(RunningBalance {
            spent,
            remaining,
            elapsed,
            interval: budget.interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::America::Sao_Paulo;

    use super::*;
    use crate::Currency;

    fn brl_daily(amount: i64) -> ExpensesData {
        ExpensesData::new(
            1,
            Budget::new(Currency::BRL, Money::new(amount), BudgetInterval::Daily),
        )
    }

    fn payload(minor: i64) -> ExpensePayload {
        ExpensePayload {
            symbol: Currency::BRL,
            amount: Money::new(minor),
            description: String::new(),
        }
    }

    #[test]
    fn record_uses_local_date_for_the_bucket() {
        let mut data = brl_daily(5000);
        // 01:30 UTC on the 6th is still the 5th in Sao Paulo.
        let now = chrono::Utc
            .with_ymd_and_hms(2024, 3, 6, 1, 30, 0)
            .unwrap()
            .with_timezone(&Sao_Paulo);
        data.record_expense(payload(1000), Money::new(1000), &now)
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(data.total_for_date(date), Money::new(1000));
    }

    #[test]
    fn record_without_budget_is_not_found() {
        let mut data = brl_daily(5000);
        data.budget = None;
        let now = Sao_Paulo.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();

        let err = data
            .record_expense(payload(1000), Money::new(1000), &now)
            .unwrap_err();
        assert!(matches!(err, EngineError::KeyNotFound(_)));
        assert_eq!(data.first_recorded_date(), None);
    }

    #[test]
    fn undo_drops_emptied_bucket() {
        let mut data = brl_daily(5000);
        let now = Sao_Paulo.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        data.record_expense(payload(700), Money::new(700), &now)
            .unwrap();

        let removed = data.undo_last(now.date_naive()).unwrap();
        assert_eq!(removed.to.amount, Money::new(700));
        assert!(data.bucket(now.date_naive()).is_none());
        assert!(data.undo_last(now.date_naive()).is_none());
    }
}
