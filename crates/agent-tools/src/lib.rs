//! Tool registry and provider implementations for the chat assistant.
//!
//! The model is told about tools through [`ToolRegistry::declare`] and asks
//! for them by name; the orchestrator hands those calls to
//! [`ToolRegistry::dispatch`].
//!
//! # Built-in Tools
//!
//! - `get_weather` ([`WeatherProvider`]) - Current temperature and wind via Open-Meteo.
//! - `get_exchange_rate` ([`ExchangeRateProvider`]) - Latest currency rates via ExchangeRate-API.
//!
//! Providers never fail: any transport or lookup problem is returned as an
//! `{"error": "..."}` object, so the model sees success and failure the same way.
//!
//! # Example
//!
//! ```rust,no_run
//! use agent_tools::{ToolRegistry, ToolsConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), agent_tools::ToolError> {
//!     let registry = ToolRegistry::new(&ToolsConfig::default())?;
//!
//!     let result = registry
//!         .dispatch(
//!             "get_exchange_rate",
//!             json!({"local_currency": "USD", "foreign_currency": "EUR"}),
//!         )
//!         .await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod registry;
mod schema;
mod tool;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use config::{ToolsConfig, DEFAULT_EXCHANGE_API_URL, DEFAULT_WEATHER_API_URL};
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use schema::ArgumentValidator;
pub use tool::{
    ExchangeRateArgs, FunctionDefinition, ResponseContract, ToolDefinition, ToolKind, WeatherArgs,
};
pub use tools::{error_payload, ExchangeRateProvider, WeatherProvider};
