//! Tool registry: declares the available tools and dispatches calls by name.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ToolsConfig;
use crate::error::ToolError;
use crate::schema::ArgumentValidator;
use crate::tool::{ExchangeRateArgs, ToolDefinition, ToolKind, WeatherArgs};
use crate::tools::{ExchangeRateProvider, WeatherProvider};

/// Registry binding every [`ToolKind`] to its provider.
///
/// Dispatch validates the arguments against the tool's schema, decodes them
/// into the typed argument struct and runs the provider. Provider failures are
/// returned as `{"error": ...}` data; only an unknown name or bad arguments
/// produce an `Err`.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    validator: ArgumentValidator,
    weather: WeatherProvider,
    exchange_rate: ExchangeRateProvider,
}

impl ToolRegistry {
    /// Build the registry with one shared HTTP client.
    pub fn new(config: &ToolsConfig) -> Result<Self, ToolError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        info!(
            "Tool registry initialized: weather={}, exchange={}",
            config.weather_api_url, config.exchange_api_url
        );

        Self::with_providers(
            WeatherProvider::new(client.clone(), config.weather_api_url.clone()),
            ExchangeRateProvider::new(client, config.exchange_api_url.clone()),
        )
    }

    /// Build the registry from environment variables.
    ///
    /// See [`ToolsConfig::from_env`].
    pub fn from_env() -> Result<Self, ToolError> {
        Self::new(&ToolsConfig::from_env())
    }

    /// Build the registry from already-constructed providers.
    ///
    /// Parameter schemas are compiled here, once per registry.
    pub fn with_providers(
        weather: WeatherProvider,
        exchange_rate: ExchangeRateProvider,
    ) -> Result<Self, ToolError> {
        Ok(Self {
            validator: ArgumentValidator::new()?,
            weather,
            exchange_rate,
        })
    }

    /// Tool declarations, in advertised order.
    pub fn declare(&self) -> Vec<ToolDefinition> {
        ToolKind::ALL.into_iter().map(ToolKind::definition).collect()
    }

    /// Names of all registered tools.
    pub fn list_tools(&self) -> Vec<&'static str> {
        ToolKind::ALL.into_iter().map(ToolKind::name).collect()
    }

    /// Check if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        ToolKind::from_name(name).is_some()
    }

    /// Run the tool called `name` with decoded JSON `arguments`.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let kind = ToolKind::from_name(name).ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        self.validator.validate(kind, &arguments)?;

        debug!("Dispatching tool '{}'", name);

        let result = match kind {
            ToolKind::Weather => {
                let args: WeatherArgs = decode_args(kind, arguments)?;
                self.weather.get(args.latitude, args.longitude).await
            }
            ToolKind::ExchangeRate => {
                let args: ExchangeRateArgs = decode_args(kind, arguments)?;
                self.exchange_rate
                    .get(&args.local_currency, &args.foreign_currency)
                    .await
            }
        };

        debug!(
            "Tool '{}' completed: error={}",
            name,
            result.get("error").is_some()
        );

        Ok(result)
    }
}

fn decode_args<T: DeserializeOwned>(kind: ToolKind, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool: kind.name().to_string(),
        reason: e.to_string(),
    })
}
