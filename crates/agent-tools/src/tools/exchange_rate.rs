//! Currency exchange rates from ExchangeRate-API.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::{endpoint, error_payload};
use crate::error::ToolError;

/// Response from the `latest/<CCY>` endpoint.
///
/// Rates stay untyped: only the requested code has to be numeric.
#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: Map<String, Value>,
    #[serde(default)]
    date: Option<String>,
}

/// Exchange-rate provider backed by ExchangeRate-API (v4, no key).
///
/// # Result
///
/// ```json
/// {"local_currency": "USD", "foreign_currency": "EUR", "rate": 0.92, "date": "2025-06-01"}
/// ```
#[derive(Debug, Clone)]
pub struct ExchangeRateProvider {
    client: Client,
    base_url: String,
}

impl ExchangeRateProvider {
    /// Create a provider that talks to `base_url` (e.g. `https://api.exchangerate-api.com/v4`).
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Rate for one unit of `local_currency` expressed in `foreign_currency`.
    ///
    /// Never fails: an unknown code or a failed call comes back as an
    /// `{"error": ...}` object.
    pub async fn get(&self, local_currency: &str, foreign_currency: &str) -> Value {
        let local = local_currency.trim().to_uppercase();
        let foreign = foreign_currency.trim().to_uppercase();

        match self.fetch_rate(&local, &foreign).await {
            Ok((rate, date)) => json!({
                "local_currency": local,
                "foreign_currency": foreign,
                "rate": rate,
                "date": date,
            }),
            Err(e) => {
                warn!(local = %local, foreign = %foreign, error = %e, "Exchange rate lookup failed");
                error_payload(e)
            }
        }
    }

    async fn fetch_rate(&self, local: &str, foreign: &str) -> Result<(f64, Option<String>), ToolError> {
        for code in [local, foreign] {
            if !is_currency_code(code) {
                return Err(ToolError::ExecutionFailed(format!(
                    "Invalid currency code: '{}'",
                    code
                )));
            }
        }

        let url = endpoint(&self.base_url, &format!("latest/{}", local));

        debug!("Fetching exchange rates from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ToolError::ExecutionFailed(format!(
                "Exchange rate API returned status {}",
                response.status()
            )));
        }

        let data: LatestRates = response.json().await?;

        let rate = data.rates.get(foreign).and_then(Value::as_f64).ok_or_else(|| {
            ToolError::ExecutionFailed(format!("No rate for {} against {}", foreign, local))
        })?;

        Ok((rate, data.date))
    }
}

/// ISO 4217 style: letters only.
fn is_currency_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphabetic())
}
