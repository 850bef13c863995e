use axum::{Router, routing::get};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use engine::{EngineError, ExpenseStore, ExpensesData, ResultEngine};

use crate::{balance, expenses};

#[derive(Clone)]
pub struct ServerState {
    pub store: ExpenseStore,
    /// Timezone that decides what "today" is.
    pub timezone: Tz,
}

impl ServerState {
    pub fn new(store: ExpenseStore, timezone: Tz) -> Self {
        Self { store, timezone }
    }

    pub(crate) fn ledger(&self, chat_id: i64) -> ResultEngine<ExpensesData> {
        self.store
            .load(chat_id)?
            .ok_or_else(|| EngineError::KeyNotFound(format!("ledger of chat {chat_id}")))
    }

    pub(crate) fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/expenses/{chat_id}/{date}", get(expenses::get_day))
        .route(
            "/expenses/{chat_id}/month/{year_month}",
            get(expenses::get_month),
        )
        .route("/balance/{chat_id}", get(balance::get_balance))
        .with_state(state)
}

pub async fn run(state: ServerState, address: &str) {
    let listener = match tokio::net::TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {address}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::Sao_Paulo;
    use engine::{Budget, BudgetInterval, Currency, ExpensePayload, Money};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    const CHAT: i64 = 77;

    fn scratch_state() -> ServerState {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_stores")
            .join(uuid::Uuid::new_v4().to_string());
        ServerState::new(ExpenseStore::new(root), Sao_Paulo)
    }

    fn payload(symbol: Currency, minor: i64, description: &str) -> ExpensePayload {
        ExpensePayload {
            symbol,
            amount: Money::new(minor),
            description: description.to_string(),
        }
    }

    /// Daily 50 BRL budget with 12.50 spent on 2024-04-08 and 40.00 (from
    /// 8 USD) on 2024-04-10.
    fn seed(state: &ServerState) {
        let budget = Budget::new(Currency::BRL, Money::new(5000), BudgetInterval::Daily);
        let mut data = ExpensesData::new(CHAT, budget);

        let first = Sao_Paulo.with_ymd_and_hms(2024, 4, 8, 9, 0, 0).unwrap();
        data.record_expense(payload(Currency::BRL, 1250, "bread"), Money::new(1250), &first)
            .unwrap();
        let second = Sao_Paulo.with_ymd_and_hms(2024, 4, 10, 20, 0, 0).unwrap();
        data.record_expense(payload(Currency::USD, 800, "taxi"), Money::new(4000), &second)
            .unwrap();

        state.store.save(CHAT, &data).unwrap();
    }

    async fn get_json(state: ServerState, uri: &str) -> (StatusCode, Value) {
        let res = router(state)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn day_summary_lists_items() {
        let state = scratch_state();
        seed(&state);

        let (status, body) = get_json(state, "/expenses/77/2024-04-10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2024-04-10");
        assert_eq!(body["symbol"], "BRL");
        assert_eq!(body["total"], 40.0);
        assert_eq!(body["available"], 10.0);
        assert_eq!(body["items"][0]["from_symbol"], "USD");
        assert_eq!(body["items"][0]["from_amount"], 8.0);
        assert_eq!(body["items"][0]["description"], "taxi");
    }

    #[tokio::test]
    async fn day_without_expenses_is_empty() {
        let state = scratch_state();
        seed(&state);

        let (status, body) = get_json(state, "/expenses/77/2024-04-09").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0.0);
        assert_eq!(body["available"], 50.0);
        assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn month_summary_uses_whole_month_allowance() {
        let state = scratch_state();
        seed(&state);

        let (status, body) = get_json(state, "/expenses/77/month/2024-04").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["month"], "2024-04");
        assert_eq!(body["total"], 52.5);
        assert_eq!(body["available"], 1500.0);
        assert_eq!(body["remaining"], 1447.5);
    }

    #[tokio::test]
    async fn balance_counts_days_since_first_expense() {
        let state = scratch_state();
        seed(&state);
        let today = Utc::now().with_timezone(&Sao_Paulo).date_naive();
        let first = chrono::NaiveDate::from_ymd_opt(2024, 4, 8).unwrap();
        let days = today.signed_duration_since(first).num_days() + 1;

        let (status, body) = get_json(state, "/balance/77").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["unit"], "Day");
        assert_eq!(body["elapsed"], days);
        assert_eq!(body["spent"], 52.5);
        assert_eq!(body["remaining"], (days * 5000 - 5250) as f64 / 100.0);
    }

    #[tokio::test]
    async fn month_total_overflow_is_422() {
        let state = scratch_state();
        let budget = Budget::new(Currency::BRL, Money::new(5000), BudgetInterval::Daily);
        let mut data = ExpensesData::new(CHAT, budget);
        let huge = Money::new(9_000_000_000_000_000_000);
        for day in [8, 9] {
            let now = Sao_Paulo.with_ymd_and_hms(2024, 4, day, 9, 0, 0).unwrap();
            data.record_expense(payload(Currency::BRL, huge.minor(), ""), huge, &now)
                .unwrap();
        }
        state.store.save(CHAT, &data).unwrap();

        let (status, body) = get_json(state.clone(), "/expenses/77/month/2024-04").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().is_some());

        let (status, _) = get_json(state, "/balance/77").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_chat_is_404() {
        let (status, body) = get_json(scratch_state(), "/balance/12345").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn malformed_dates_are_400() {
        let state = scratch_state();
        seed(&state);

        let (status, _) = get_json(state.clone(), "/expenses/77/10-04-2024").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(state, "/expenses/77/month/2024-13").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
