//! CurrencyBeacon client, the conversion service behind foreign-currency
//! expenses.

use engine::{Converter, Currency, EngineError, Money, ResultEngine};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.currencybeacon.com/v1";

#[derive(Clone, Debug)]
pub struct CurrencyBeacon {
    client: Client,
    base_url: String,
    api_key: String,
}

/// `/convert` answers with the value both at the top level (legacy) and
/// inside `response`.
#[derive(Debug, Deserialize)]
struct ConvertBody {
    value: Option<f64>,
    response: Option<ConvertInner>,
}

#[derive(Debug, Deserialize)]
struct ConvertInner {
    value: f64,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ExchangeError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("response without a converted value")]
    MissingValue,
}

impl From<ExchangeError> for EngineError {
    fn from(value: ExchangeError) -> Self {
        EngineError::Conversion(value.to_string())
    }
}

impl CurrencyBeacon {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn fetch_conversion(
        &self,
        from: Currency,
        to: Currency,
        amount: Money,
    ) -> Result<f64, ExchangeError> {
        let amount = amount.to_string();
        let resp = self
            .client
            .get(self.url("/convert"))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("from", from.code()),
                ("to", to.code()),
                ("amount", amount.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.text().await {
                Ok(body) => body,
                Err(_) => "server error".to_string(),
            };
            return Err(ExchangeError::Server { status, message });
        }

        let body = resp.json::<ConvertBody>().await?;
        body.value
            .or(body.response.map(|inner| inner.value))
            .ok_or(ExchangeError::MissingValue)
    }
}

impl Converter for CurrencyBeacon {
    async fn convert(&self, from: Currency, to: Currency, amount: Money) -> ResultEngine<f64> {
        match self.fetch_conversion(from, to, amount).await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::error!("conversion {from} -> {to} failed: {err}");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let beacon = CurrencyBeacon::new(Client::new(), "https://example.test/v1/", "key");
        assert_eq!(beacon.url("/convert"), "https://example.test/v1/convert");
    }

    #[test]
    fn value_is_read_from_either_place() {
        let top: ConvertBody = serde_json::from_str(r#"{"value": 55.5}"#).unwrap();
        assert_eq!(top.value, Some(55.5));

        let nested: ConvertBody =
            serde_json::from_str(r#"{"meta": {"code": 200}, "response": {"value": 3.2}}"#)
                .unwrap();
        assert_eq!(nested.response.map(|inner| inner.value), Some(3.2));
    }

    #[test]
    fn failures_become_conversion_errors() {
        let err: EngineError = ExchangeError::MissingValue.into();
        assert!(matches!(err, EngineError::Conversion(_)));
    }
}
