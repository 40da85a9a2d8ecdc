//! Current conditions from the Open-Meteo forecast API.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{endpoint, error_payload};
use crate::error::ToolError;

/// Fields requested in the `current` block.
const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m";

/// Fields that must come back as numbers.
const REQUIRED_NUMERIC: [&str; 2] = ["temperature_2m", "wind_speed_10m"];

/// Weather provider backed by Open-Meteo.
///
/// Free, no API key. Returns the provider's `current` object verbatim, e.g.
///
/// ```json
/// {"time": "2025-06-01T12:00", "interval": 900, "temperature_2m": 21.4, "wind_speed_10m": 11.2}
/// ```
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
}

impl WeatherProvider {
    /// Create a provider that talks to `base_url` (e.g. `https://api.open-meteo.com/v1`).
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Current conditions at a coordinate pair.
    ///
    /// Never fails: transport, status and parsing problems come back as an
    /// `{"error": ...}` object.
    pub async fn get(&self, latitude: f64, longitude: f64) -> Value {
        match self.fetch_current(latitude, longitude).await {
            Ok(current) => current,
            Err(e) => {
                warn!(latitude, longitude, error = %e, "Weather lookup failed");
                error_payload(e)
            }
        }
    }

    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<Value, ToolError> {
        let url = endpoint(&self.base_url, "forecast");

        debug!("Fetching weather from: {} ({}, {})", url, latitude, longitude);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::ExecutionFailed(format!(
                "Weather API returned status {}",
                response.status()
            )));
        }

        let mut data: Value = response.json().await?;

        let current = data
            .get_mut("current")
            .map(Value::take)
            .filter(Value::is_object)
            .ok_or_else(|| {
                ToolError::ExecutionFailed("No current conditions in weather response".to_string())
            })?;

        for field in REQUIRED_NUMERIC {
            if !current.get(field).is_some_and(Value::is_number) {
                return Err(ToolError::ExecutionFailed(format!(
                    "Weather response is missing numeric '{}'",
                    field
                )));
            }
        }

        Ok(current)
    }
}
