//! Configuration for the tool providers.

use std::env;
use std::time::Duration;

/// Default Open-Meteo API root.
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.open-meteo.com/v1";

/// Default ExchangeRate-API root.
pub const DEFAULT_EXCHANGE_API_URL: &str = "https://api.exchangerate-api.com/v4";

/// Default HTTP timeout for provider requests (10 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Endpoints and HTTP settings shared by the built-in tools.
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Root of the forecast API (`{root}/forecast`).
    pub weather_api_url: String,
    /// Root of the exchange-rate API (`{root}/latest/<CCY>`).
    pub exchange_api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent sent with every provider request.
    pub user_agent: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            exchange_api_url: DEFAULT_EXCHANGE_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: "ChatBot/1.0".to_string(),
        }
    }
}

impl ToolsConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `WEATHER_API_URL` - Forecast API root (default: Open-Meteo)
    /// - `EXCHANGE_API_URL` - Exchange-rate API root (default: ExchangeRate-API v4)
    /// - `TOOL_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let weather_api_url = env::var("WEATHER_API_URL").unwrap_or(defaults.weather_api_url);
        let exchange_api_url = env::var("EXCHANGE_API_URL").unwrap_or(defaults.exchange_api_url);

        let timeout = env::var("TOOL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            weather_api_url,
            exchange_api_url,
            timeout,
            user_agent: defaults.user_agent,
        }
    }

    /// Point both providers at custom roots.
    pub fn with_urls(weather_api_url: impl Into<String>, exchange_api_url: impl Into<String>) -> Self {
        Self {
            weather_api_url: weather_api_url.into(),
            exchange_api_url: exchange_api_url.into(),
            ..Self::default()
        }
    }
}
