//! Chat model seam and the OpenAI-compatible client behind it.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::ChatBrainConfig;
use crate::error::BrainError;

/// Something that turns a completion request into one assistant message.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion and return the first choice's message.
    async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatMessage, BrainError>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// Client for `POST {api_url}/v1/chat/completions`.
pub struct OpenAiChatModel {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OpenAiChatModel {
    /// Create a client from the orchestrator configuration.
    pub fn new(config: &ChatBrainConfig) -> Result<Self, BrainError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatMessage, BrainError> {
        let url = format!("{}/v1/chat/completions", self.api_url);

        debug!(
            "Sending request to {} with model {} ({} messages)",
            url,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(ApiError { error }) => match error.error_type {
                    Some(kind) => format!("{}: {}", kind, error.message),
                    None => error.message,
                },
                Err(_) => error_text,
            };
            return Err(BrainError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| BrainError::MalformedResponse("response has no choices".to_string()))
    }

    fn name(&self) -> &str {
        "OpenAiChatModel"
    }
}
