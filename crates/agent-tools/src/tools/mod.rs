//! Built-in tool providers.

mod exchange_rate;
mod weather;

pub use exchange_rate::ExchangeRateProvider;
pub use weather::WeatherProvider;

use serde_json::{json, Value};

/// The `{"error": ...}` object a provider returns instead of failing.
pub fn error_payload(error: impl std::fmt::Display) -> Value {
    json!({ "error": error.to_string() })
}

/// Join an API root and a path without doubling the slash.
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}
