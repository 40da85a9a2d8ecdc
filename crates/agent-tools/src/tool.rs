//! Tool kinds, their typed arguments and the declarations advertised to the model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Every tool the assistant can call.
///
/// The registry is a closed set: the model can only reach these variants, and
/// each variant carries its own argument type, parameter schema and response
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Current conditions for a coordinate pair.
    Weather,
    /// Latest rate for a currency pair.
    ExchangeRate,
}

impl ToolKind {
    /// All tools, in the order they are advertised.
    pub const ALL: [ToolKind; 2] = [ToolKind::Weather, ToolKind::ExchangeRate];

    /// The name the model uses to call this tool.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Weather => "get_weather",
            ToolKind::ExchangeRate => "get_exchange_rate",
        }
    }

    /// Look up a tool by the name the model used.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::Weather => {
                "Get the current temperature for a specific geographic location \
                 using latitude and longitude"
            }
            ToolKind::ExchangeRate => {
                "Get the exchange rate and metadata for a specific currency pair"
            }
        }
    }

    /// Strict JSON schema for the tool's arguments.
    pub fn parameters(self) -> Value {
        match self {
            ToolKind::Weather => json!({
                "type": "object",
                "properties": {
                    "latitude": {
                        "type": "number",
                        "description": "Latitude of the location"
                    },
                    "longitude": {
                        "type": "number",
                        "description": "Longitude of the location"
                    }
                },
                "required": ["latitude", "longitude"],
                "additionalProperties": false
            }),
            ToolKind::ExchangeRate => json!({
                "type": "object",
                "properties": {
                    "local_currency": {
                        "type": "string",
                        "description": "The base currency code (e.g., 'USD')"
                    },
                    "foreign_currency": {
                        "type": "string",
                        "description": "The target currency code (e.g., 'EUR')"
                    }
                },
                "required": ["local_currency", "foreign_currency"],
                "additionalProperties": false
            }),
        }
    }

    /// The declaration sent to the model in the `tools` array.
    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: self.name().to_string(),
                description: Some(self.description().to_string()),
                strict: true,
                parameters: self.parameters(),
            },
        }
    }

    /// How the follow-up completion should be shaped after this tool ran.
    pub fn response_contract(self) -> ResponseContract {
        match self {
            ToolKind::Weather => ResponseContract::WeatherReport,
            ToolKind::ExchangeRate => ResponseContract::FreeText,
        }
    }
}

/// Shape of the completion requested after tool results are fed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseContract {
    /// Ordinary assistant text.
    FreeText,
    /// Structured `{temperature, response}` object; only `response` is shown.
    WeatherReport,
}

impl ResponseContract {
    /// Merge the contracts of every tool invoked in one turn.
    ///
    /// Tools that agree keep their contract. Any disagreement, or no tools at
    /// all, yields [`ResponseContract::FreeText`].
    pub fn combine<I>(contracts: I) -> Self
    where
        I: IntoIterator<Item = ResponseContract>,
    {
        let mut contracts = contracts.into_iter();
        let Some(first) = contracts.next() else {
            return ResponseContract::FreeText;
        };
        if contracts.all(|contract| contract == first) {
            first
        } else {
            ResponseContract::FreeText
        }
    }
}

/// Arguments for [`ToolKind::Weather`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherArgs {
    pub latitude: f64,
    pub longitude: f64,
}

/// Arguments for [`ToolKind::ExchangeRate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExchangeRateArgs {
    pub local_currency: String,
    pub foreign_currency: String,
}

/// A tool declaration in the OpenAI-compatible `tools` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool type (always "function").
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function specification.
    pub function: FunctionDefinition,
}

/// Function definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function.
    pub name: String,
    /// Description of what the function does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ask the provider to enforce the schema exactly.
    #[serde(default)]
    pub strict: bool,
    /// JSON Schema for the function parameters.
    pub parameters: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips_every_kind() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("get_stock_price"), None);
    }

    #[test]
    fn test_definition_is_strict_and_closed() {
        let tool = ToolKind::ExchangeRate.definition();
        assert_eq!(tool.tool_type, "function");
        assert_eq!(tool.function.name, "get_exchange_rate");
        assert!(tool.function.strict);
        assert_eq!(tool.function.parameters["additionalProperties"], false);
        assert_eq!(
            tool.function.parameters["required"],
            json!(["local_currency", "foreign_currency"])
        );

        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["strict"], true);
    }

    #[test]
    fn test_combine_contracts() {
        use ResponseContract::*;

        assert_eq!(ResponseContract::combine([]), FreeText);
        assert_eq!(ResponseContract::combine([WeatherReport]), WeatherReport);
        assert_eq!(
            ResponseContract::combine([WeatherReport, WeatherReport]),
            WeatherReport
        );
        assert_eq!(ResponseContract::combine([WeatherReport, FreeText]), FreeText);
        assert_eq!(ResponseContract::combine([FreeText, WeatherReport]), FreeText);
    }

    #[test]
    fn test_args_reject_unknown_fields() {
        let ok: WeatherArgs =
            serde_json::from_value(json!({"latitude": 1.5, "longitude": -2.0})).unwrap();
        assert_eq!(ok.latitude, 1.5);

        let extra = serde_json::from_value::<WeatherArgs>(
            json!({"latitude": 1.5, "longitude": -2.0, "units": "metric"}),
        );
        assert!(extra.is_err());
    }
}
