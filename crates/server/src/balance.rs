use api_types::balance::BalanceSummary;
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState};

/// Handle requests for the running balance of a chat
pub async fn get_balance(
    State(state): State<ServerState>,
    Path(chat_id): Path<i64>,
) -> Result<Json<BalanceSummary>, ServerError> {
    let data = state.ledger(chat_id)?;
    let symbol = data.budget()?.symbol;
    let balance = data.running_balance(state.today())?;

    Ok(Json(BalanceSummary {
        symbol: symbol.to_string(),
        spent: balance.spent.to_major(),
        remaining: balance.remaining.to_major(),
        elapsed: balance.elapsed,
        unit: balance.unit_label().to_string(),
    }))
}
