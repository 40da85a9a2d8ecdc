//! Tool-calling conversation orchestrator.
//!
//! One call to [`ChatOrchestrator::respond`] runs a whole turn:
//!
//! 1. assemble the system prompt, recent history and the new user message;
//! 2. ask the primary model, advertising the registry's tools;
//! 3. if it asked for tools, run each call in order and append the results;
//! 4. ask the secondary model for the final answer, in the shape the invoked
//!    tools' response contracts agree on.
//!
//! Any failure along the way is logged and answered with [`FALLBACK_MESSAGE`].

use std::sync::Arc;

use agent_tools::{ResponseContract, ToolError, ToolKind, ToolRegistry};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::api_types::{ChatCompletionRequest, ChatMessage, ResponseFormat, ToolCall, WeatherReport};
use crate::config::ChatBrainConfig;
use crate::error::BrainError;
use crate::history::ConversationTurn;
use crate::model::{ChatModel, OpenAiChatModel};
use crate::prompt::hash_prompt;

/// Reply shown to the user whenever a turn cannot be completed.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, something went wrong while generating a response. Please try again.";

/// Runs conversation turns against a [`ChatModel`] with a [`ToolRegistry`].
pub struct ChatOrchestrator {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    config: ChatBrainConfig,
    system_prompt_hash: String,
}

impl ChatOrchestrator {
    /// Create an orchestrator from its parts.
    pub fn new(config: ChatBrainConfig, model: Arc<dyn ChatModel>, tools: ToolRegistry) -> Self {
        let system_prompt_hash = hash_prompt(&config.system_prompt);
        info!("System prompt fingerprint: {}", system_prompt_hash);
        info!(
            "ChatOrchestrator initialized with {} (primary: {}, secondary: {}, tools: {:?})",
            model.name(),
            config.primary_model,
            config.secondary_model,
            tools.list_tools()
        );

        Self {
            model,
            tools,
            config,
            system_prompt_hash,
        }
    }

    /// Create an orchestrator backed by the OpenAI-compatible API.
    ///
    /// See [`ChatBrainConfig::from_env`] and [`agent_tools::ToolsConfig::from_env`]
    /// for the environment variables read.
    pub fn from_env() -> Result<Self, BrainError> {
        let config = ChatBrainConfig::from_env()?;
        let model = OpenAiChatModel::new(&config)?;
        let tools = ToolRegistry::from_env()?;
        Ok(Self::new(config, Arc::new(model), tools))
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChatBrainConfig {
        &self.config
    }

    /// Number of persisted messages to load as context.
    pub fn context_messages(&self) -> usize {
        self.config.context_messages
    }

    /// SHA-256 fingerprint of the configured system prompt.
    pub fn system_prompt_hash(&self) -> &str {
        &self.system_prompt_hash
    }

    /// Build the message list for the first dispatch.
    ///
    /// Exactly one system message, then at most `context_messages` of the
    /// most recent turns in chronological order, then the new user message.
    pub fn assemble(&self, history: &[ConversationTurn], user_text: &str) -> Vec<ChatMessage> {
        let skip = history.len().saturating_sub(self.config.context_messages);
        let window = &history[skip..];

        let mut messages = Vec::with_capacity(window.len() + 2);
        messages.push(ChatMessage::system(&self.config.system_prompt));
        messages.extend(window.iter().map(ConversationTurn::to_chat_message));
        messages.push(ChatMessage::user(user_text));
        messages
    }

    /// Produce the assistant's reply for one user message.
    ///
    /// Never fails: errors are logged and [`FALLBACK_MESSAGE`] is returned.
    pub async fn respond(&self, history: &[ConversationTurn], user_text: &str) -> String {
        match self.try_respond(history, user_text).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Failed to generate response: {}", e);
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    /// Produce the assistant's reply, surfacing the first failure.
    pub async fn try_respond(
        &self,
        history: &[ConversationTurn],
        user_text: &str,
    ) -> Result<String, BrainError> {
        let mut messages = self.assemble(history, user_text);
        debug!("Assembled {} messages for first dispatch", messages.len());

        let first = self
            .model
            .complete(self.request(&self.config.primary_model, messages.clone(), None))
            .await?;

        if first.requested_tool_calls().is_empty() {
            return first
                .content
                .ok_or_else(|| BrainError::MalformedResponse("reply has no content".to_string()));
        }

        let calls = first.requested_tool_calls().to_vec();
        info!(
            "Model requested {} tool call(s): {:?}",
            calls.len(),
            calls.iter().map(|c| c.function.name.as_str()).collect::<Vec<_>>()
        );
        messages.push(first);

        let mut contracts = Vec::with_capacity(calls.len());
        for call in &calls {
            let (kind, result) = self.execute(call).await?;
            contracts.push(kind.response_contract());
            messages.push(ChatMessage::tool(
                &call.id,
                &call.function.name,
                result.to_string(),
            ));
        }

        let contract = ResponseContract::combine(contracts);
        debug!("Second dispatch with {:?} response contract", contract);

        let response_format = match contract {
            ResponseContract::WeatherReport => Some(ResponseFormat::weather_report()),
            ResponseContract::FreeText => None,
        };

        let second = self
            .model
            .complete(self.request(&self.config.secondary_model, messages, response_format))
            .await?;

        let content = second.content.ok_or_else(|| {
            BrainError::MalformedResponse("follow-up reply has no content".to_string())
        })?;

        match contract {
            ResponseContract::FreeText => Ok(content),
            ResponseContract::WeatherReport => {
                let report: WeatherReport = serde_json::from_str(&content).map_err(|e| {
                    BrainError::MalformedResponse(format!("invalid weather report: {}", e))
                })?;
                debug!("Weather report temperature: {}", report.temperature);
                Ok(report.response)
            }
        }
    }

    /// Decode and run one tool call. Tool-level failures come back as data.
    async fn execute(&self, call: &ToolCall) -> Result<(ToolKind, Value), BrainError> {
        let name = call.function.name.as_str();
        let kind = ToolKind::from_name(name).ok_or_else(|| {
            warn!("Model requested unknown tool: {}", name);
            ToolError::NotFound(name.to_string())
        })?;

        let arguments: Value = serde_json::from_str(&call.function.arguments).map_err(|source| {
            warn!("Malformed arguments for {}: {}", name, call.function.arguments);
            BrainError::ArgumentDecode {
                tool: name.to_string(),
                source,
            }
        })?;

        debug!("Executing tool {} ({}) with {}", name, call.id, arguments);
        let result = self.tools.dispatch(name, arguments).await?;
        if result.get("error").is_some() {
            warn!("Tool {} returned an error payload: {}", name, result);
        }

        Ok((kind, result))
    }

    fn request(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        response_format: Option<ResponseFormat>,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            tools: Some(self.tools.declare()),
            response_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::FunctionCall;
    use crate::test_support::{serve, unreachable_url, ScriptedModel};
    use agent_tools::ToolsConfig;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    fn config() -> ChatBrainConfig {
        ChatBrainConfig::builder()
            .api_key("sk-test")
            .primary_model("primary")
            .secondary_model("secondary")
            .build()
    }

    async fn offline_tools() -> ToolRegistry {
        let url = unreachable_url().await;
        ToolRegistry::new(&ToolsConfig::with_urls(url.clone(), url)).unwrap()
    }

    async fn live_tools() -> ToolRegistry {
        let weather = serve(Router::new().route(
            "/forecast",
            get(|| async {
                Json(json!({
                    "current": {
                        "time": "2025-06-01T12:00",
                        "interval": 900,
                        "temperature_2m": 21.5,
                        "wind_speed_10m": 3.2
                    }
                }))
            }),
        ))
        .await;
        let exchange = serve(Router::new().route(
            "/latest/:base",
            get(|| async { Json(json!({"date": "2025-06-01", "rates": {"EUR": 0.92}})) }),
        ))
        .await;
        ToolRegistry::new(&ToolsConfig::with_urls(weather, exchange)).unwrap()
    }

    fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    fn calls_tools(calls: Vec<ToolCall>) -> ChatMessage {
        ChatMessage {
            content: None,
            tool_calls: Some(calls),
            ..ChatMessage::assistant("")
        }
    }

    const USD_EUR: &str = r#"{"local_currency":"USD","foreign_currency":"EUR"}"#;
    const BERLIN: &str = r#"{"latitude":52.52,"longitude":13.41}"#;

    #[tokio::test]
    async fn test_assemble_order_and_single_system_message() {
        let model = ScriptedModel::new(vec![]);
        let orchestrator = ChatOrchestrator::new(config(), Arc::new(model), offline_tools().await);

        let history = vec![
            ConversationTurn::user("first"),
            ConversationTurn::bot("second"),
            ConversationTurn::user("third"),
        ];
        let messages = orchestrator.assemble(&history, "fourth");

        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user", "user"]);
        assert_eq!(messages.iter().filter(|m| m.role == "system").count(), 1);
        assert_eq!(messages[0].content.as_deref(), Some("Keep your response short."));

        let contents: Vec<&str> = messages[1..]
            .iter()
            .filter_map(|m| m.content.as_deref())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third", "fourth"]);
    }

    #[tokio::test]
    async fn test_assemble_caps_history() {
        let model = ScriptedModel::new(vec![]);
        let config = ChatBrainConfig::builder().context_messages(3).build();
        let orchestrator = ChatOrchestrator::new(config, Arc::new(model), offline_tools().await);

        let history: Vec<ConversationTurn> = (1..=8)
            .map(|i| ConversationTurn::user(format!("m{}", i)))
            .collect();
        let messages = orchestrator.assemble(&history, "now");

        let contents: Vec<&str> = messages
            .iter()
            .filter_map(|m| m.content.as_deref())
            .collect();
        assert_eq!(
            contents,
            vec!["Keep your response short.", "m6", "m7", "m8", "now"]
        );
    }

    #[tokio::test]
    async fn test_primary_failure_returns_fallback() {
        let model = ScriptedModel::new(vec![Err(BrainError::Network("connection refused".into()))]);
        let orchestrator = ChatOrchestrator::new(config(), Arc::new(model), offline_tools().await);

        let reply = orchestrator.respond(&[], "hello").await;
        assert_eq!(reply, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_plain_reply_is_returned_unchanged() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(ChatMessage::assistant(
            "  Hi there!\n",
        ))]));
        let orchestrator = ChatOrchestrator::new(config(), model.clone(), offline_tools().await);

        let reply = orchestrator.respond(&[], "hello").await;
        assert_eq!(reply, "  Hi there!\n");

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "primary");
        assert_eq!(requests[0].tools.as_ref().map(Vec::len), Some(2));
        assert!(requests[0].response_format.is_none());
    }

    #[tokio::test]
    async fn test_exchange_rate_round_trip() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(calls_tools(vec![tool_call("call_1", "get_exchange_rate", USD_EUR)])),
            Ok(ChatMessage::assistant("1 USD is 0.92 EUR.")),
        ]));
        let orchestrator = ChatOrchestrator::new(config(), model.clone(), live_tools().await);

        let reply = orchestrator
            .respond(&[], "What is the USD to EUR exchange rate?")
            .await;
        assert_eq!(reply, "1 USD is 0.92 EUR.");

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        let second = &requests[1];
        assert_eq!(second.model, "secondary");
        assert!(second.tools.is_some());
        assert!(second.response_format.is_none());

        let roles: Vec<&str> = second.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "tool"]);

        let tool_message = &second.messages[3];
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(tool_message.name.as_deref(), Some("get_exchange_rate"));
        let payload: Value =
            serde_json::from_str(tool_message.content.as_deref().unwrap()).unwrap();
        assert_eq!(payload["rate"], 0.92);
        assert_eq!(payload["local_currency"], "USD");
        assert_eq!(payload["foreign_currency"], "EUR");
    }

    #[tokio::test]
    async fn test_unreachable_tool_is_fed_back_as_error() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(calls_tools(vec![tool_call("call_1", "get_exchange_rate", USD_EUR)])),
            Ok(ChatMessage::assistant("I couldn't fetch the rate right now.")),
        ]));
        let orchestrator = ChatOrchestrator::new(config(), model.clone(), offline_tools().await);

        let reply = orchestrator.respond(&[], "USD to EUR?").await;
        assert_eq!(reply, "I couldn't fetch the rate right now.");

        let requests = model.requests();
        assert_eq!(requests.len(), 2);
        let tool_message = requests[1].messages.last().unwrap();
        let payload: Value =
            serde_json::from_str(tool_message.content.as_deref().unwrap()).unwrap();
        assert!(payload["error"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_tool_returns_fallback() {
        let unknown = || Ok(calls_tools(vec![tool_call("call_1", "get_stock_price", "{}")]));
        let model = Arc::new(ScriptedModel::new(vec![unknown(), unknown()]));
        let orchestrator = ChatOrchestrator::new(config(), model.clone(), offline_tools().await);

        let err = orchestrator.try_respond(&[], "AAPL?").await.unwrap_err();
        assert!(matches!(err, BrainError::Tool(ToolError::NotFound(_))));
        assert_eq!(orchestrator.respond(&[], "AAPL?").await, FALLBACK_MESSAGE);
        assert_eq!(model.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_arguments_return_fallback() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(calls_tools(vec![tool_call(
            "call_1",
            "get_weather",
            "{latitude: 52.5",
        )]))]));
        let orchestrator = ChatOrchestrator::new(config(), model.clone(), offline_tools().await);

        let err = orchestrator.try_respond(&[], "weather?").await.unwrap_err();
        assert!(matches!(err, BrainError::ArgumentDecode { ref tool, .. } if tool == "get_weather"));
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_schema_violation_returns_fallback() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(calls_tools(vec![tool_call(
            "call_1",
            "get_weather",
            r#"{"latitude":"north","longitude":13.41}"#,
        )]))]));
        let orchestrator = ChatOrchestrator::new(config(), model.clone(), offline_tools().await);

        let reply = orchestrator.respond(&[], "weather?").await;
        assert_eq!(reply, FALLBACK_MESSAGE);
        assert_eq!(model.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_weather_turn_uses_structured_response() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(calls_tools(vec![tool_call("call_1", "get_weather", BERLIN)])),
            Ok(ChatMessage::assistant(
                r#"{"temperature":21.5,"response":"It's 21.5°C in Berlin."}"#,
            )),
        ]));
        let orchestrator = ChatOrchestrator::new(config(), model.clone(), live_tools().await);

        let reply = orchestrator.respond(&[], "Weather in Berlin?").await;
        assert_eq!(reply, "It's 21.5°C in Berlin.");

        let requests = model.requests();
        assert_eq!(
            requests[1].response_format,
            Some(ResponseFormat::weather_report())
        );
        let payload: Value =
            serde_json::from_str(requests[1].messages[3].content.as_deref().unwrap()).unwrap();
        assert_eq!(payload["temperature_2m"], 21.5);
        assert_eq!(payload["wind_speed_10m"], 3.2);
    }

    #[tokio::test]
    async fn test_invalid_weather_report_returns_fallback() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(calls_tools(vec![tool_call("call_1", "get_weather", BERLIN)])),
            Ok(ChatMessage::assistant("It is warm.")),
        ]));
        let orchestrator = ChatOrchestrator::new(config(), model, live_tools().await);

        assert_eq!(orchestrator.respond(&[], "Weather?").await, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_mixed_tools_use_free_text() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(calls_tools(vec![
                tool_call("call_1", "get_weather", BERLIN),
                tool_call("call_2", "get_exchange_rate", USD_EUR),
            ])),
            Ok(ChatMessage::assistant("21.5°C, and 1 USD buys 0.92 EUR.")),
        ]));
        let orchestrator = ChatOrchestrator::new(config(), model.clone(), live_tools().await);

        let reply = orchestrator.respond(&[], "Weather and USD/EUR?").await;
        assert_eq!(reply, "21.5°C, and 1 USD buys 0.92 EUR.");

        let requests = model.requests();
        let second = &requests[1];
        assert!(second.response_format.is_none());
        let ids: Vec<Option<&str>> = second
            .messages
            .iter()
            .filter(|m| m.role == "tool")
            .map(|m| m.tool_call_id.as_deref())
            .collect();
        assert_eq!(ids, vec![Some("call_1"), Some("call_2")]);
    }

    #[tokio::test]
    async fn test_second_dispatch_failure_returns_fallback() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(calls_tools(vec![tool_call("call_1", "get_exchange_rate", USD_EUR)])),
            Err(BrainError::Api {
                status: 500,
                message: "upstream".into(),
            }),
        ]));
        let orchestrator = ChatOrchestrator::new(config(), model, live_tools().await);

        assert_eq!(orchestrator.respond(&[], "USD to EUR?").await, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_history_is_sent_with_request() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(ChatMessage::assistant("Sure."))]));
        let orchestrator = ChatOrchestrator::new(config(), model.clone(), offline_tools().await);

        let history = vec![ConversationTurn::user("hi"), ConversationTurn::bot("hello")];
        orchestrator.respond(&history, "thanks").await;

        let sent = &model.requests()[0].messages;
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[1], ChatMessage::user("hi"));
        assert_eq!(sent[2], ChatMessage::assistant("hello"));
        assert_eq!(sent[3], ChatMessage::user("thanks"));
    }
}
