use std::future::Future;

use crate::{Budget, Currency, ExpensePayload, Money, ResultEngine};

/// Currency conversion service.
///
/// Returns the raw converted value in major units. Errors are not
/// distinguished by kind; any failure aborts the command that asked for it.
pub trait Converter: Send + Sync {
    fn convert(
        &self,
        from: Currency,
        to: Currency,
        amount: Money,
    ) -> impl Future<Output = ResultEngine<f64>> + Send;
}

/// Expresses `payload` in the budget currency.
///
/// No conversion call is issued when the currencies already match. Converted
/// values are truncated to cents.
pub async fn convert_for_budget<C: Converter>(
    converter: &C,
    payload: &ExpensePayload,
    budget: &Budget,
) -> ResultEngine<Money> {
    if payload.symbol == budget.symbol {
        return Ok(payload.amount);
    }

    let value = converter
        .convert(payload.symbol, budget.symbol, payload.amount)
        .await?;
    tracing::debug!(
        "converted {} {} into {value} {}",
        payload.amount,
        payload.symbol,
        budget.symbol
    );
    Money::from_major_truncated(value)
}
