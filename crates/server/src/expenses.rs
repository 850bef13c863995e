//! Expenses API endpoints

use api_types::expenses::{DaySummary, ExpenseView, MonthSummary};
use axum::{
    Json,
    extract::{Path, State},
};
use engine::{Expense, YearMonth, parse_date};

use crate::{ServerError, server::ServerState};

fn view(expense: &Expense) -> ExpenseView {
    ExpenseView {
        timestamp: expense.timestamp,
        from_symbol: expense.from.symbol.to_string(),
        from_amount: expense.from.amount.to_major(),
        to_symbol: expense.to.symbol.to_string(),
        to_amount: expense.to.amount.to_major(),
        description: expense.description.clone(),
    }
}

/// Handle requests for the expenses of a single day
pub async fn get_day(
    State(state): State<ServerState>,
    Path((chat_id, date)): Path<(i64, String)>,
) -> Result<Json<DaySummary>, ServerError> {
    let date = parse_date(&date)?;
    let data = state.ledger(chat_id)?;
    let symbol = data.budget()?.symbol;

    let items = data
        .bucket(date)
        .map(|bucket| bucket.items().iter().map(view).collect())
        .unwrap_or_default();

    Ok(Json(DaySummary {
        date,
        symbol: symbol.to_string(),
        total: data.total_for_date(date).to_major(),
        available: data.remaining_in_interval(date)?.to_major(),
        items,
    }))
}

/// Handle requests for a month summary
pub async fn get_month(
    State(state): State<ServerState>,
    Path((chat_id, month)): Path<(i64, String)>,
) -> Result<Json<MonthSummary>, ServerError> {
    let month = month.parse::<YearMonth>()?;
    let data = state.ledger(chat_id)?;
    let symbol = data.budget()?.symbol;

    let total = data.total_for_month(month)?;
    let available = data.available_budget(month.first_day()?)?;
    let remaining = data.remaining_in_month(month)?;

    Ok(Json(MonthSummary {
        month: month.to_string(),
        symbol: symbol.to_string(),
        total: total.to_major(),
        available: available.to_major(),
        remaining: remaining.to_major(),
    }))
}
