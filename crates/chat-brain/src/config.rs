//! Configuration for the chat orchestrator.

use crate::error::BrainError;
use crate::prompt::DEFAULT_SYSTEM_PROMPT;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Default system prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "SYSTEM_PROMPT.md";

/// Default OpenAI-compatible API URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// Model used for the first dispatch.
pub const DEFAULT_PRIMARY_MODEL: &str = "gpt-4o-mini";

/// Model used for the follow-up dispatch after tool calls.
pub const DEFAULT_SECONDARY_MODEL: &str = "gpt-4o";

/// Configuration for [`crate::ChatOrchestrator`].
#[derive(Debug, Clone)]
pub struct ChatBrainConfig {
    /// OpenAI-compatible API URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model for the first dispatch.
    pub primary_model: String,

    /// Model for the second dispatch.
    pub secondary_model: String,

    /// System prompt sent first on every request.
    pub system_prompt: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Number of persisted messages used as context.
    pub context_messages: usize,

    /// Model request timeout.
    pub request_timeout: Duration,
}

impl Default for ChatBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            secondary_model: DEFAULT_SECONDARY_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: Some(1024),
            temperature: Some(0.7),
            context_messages: 10,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ChatBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_URL` - API URL (default: https://api.openai.com)
    /// - `CHAT_PRIMARY_MODEL` - First dispatch model (default: gpt-4o-mini)
    /// - `CHAT_SECONDARY_MODEL` - Follow-up model (default: gpt-4o)
    /// - `CHAT_SYSTEM_PROMPT` - System prompt (overrides prompt file)
    /// - `CHAT_PROMPT_FILE` - Path to system prompt file (default: SYSTEM_PROMPT.md)
    /// - `CHAT_MAX_TOKENS` - Max tokens (default: 1024)
    /// - `CHAT_TEMPERATURE` - Temperature (default: 0.7)
    /// - `CHAT_CONTEXT_MESSAGES` - Persisted messages used as context (default: 10)
    ///
    /// System prompt priority:
    /// 1. `CHAT_SYSTEM_PROMPT` env var (if set)
    /// 2. Contents of prompt file (if exists)
    /// 3. [`DEFAULT_SYSTEM_PROMPT`]
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BrainError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let api_url = env::var("OPENAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let primary_model =
            env::var("CHAT_PRIMARY_MODEL").unwrap_or_else(|_| DEFAULT_PRIMARY_MODEL.to_string());

        let secondary_model = env::var("CHAT_SECONDARY_MODEL")
            .unwrap_or_else(|_| DEFAULT_SECONDARY_MODEL.to_string());

        let system_prompt = match env::var("CHAT_SYSTEM_PROMPT") {
            Ok(prompt) => prompt,
            Err(_) => {
                let prompt_file = env::var("CHAT_PROMPT_FILE")
                    .unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
                load_prompt_file(&prompt_file)
                    .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
            }
        };

        let max_tokens = env::var("CHAT_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(1024));

        let temperature = env::var("CHAT_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(0.7));

        let context_messages = env::var("CHAT_CONTEXT_MESSAGES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Ok(Self {
            api_url,
            api_key,
            primary_model,
            secondary_model,
            system_prompt,
            max_tokens,
            temperature,
            context_messages,
            ..Self::default()
        })
    }

    /// Create a new config builder.
    pub fn builder() -> ChatBrainConfigBuilder {
        ChatBrainConfigBuilder::default()
    }
}

/// Builder for ChatBrainConfig.
#[derive(Debug, Default)]
pub struct ChatBrainConfigBuilder {
    config: ChatBrainConfig,
}

impl ChatBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the first dispatch model.
    pub fn primary_model(mut self, model: impl Into<String>) -> Self {
        self.config.primary_model = model.into();
        self
    }

    /// Set the follow-up model.
    pub fn secondary_model(mut self, model: impl Into<String>) -> Self {
        self.config.secondary_model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the number of persisted messages used as context.
    pub fn context_messages(mut self, count: usize) -> Self {
        self.config.context_messages = count;
        self
    }

    /// Set the model request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ChatBrainConfig {
        self.config
    }

    /// Load system prompt from a file.
    ///
    /// If the file exists and is non-empty, sets the system prompt.
    pub fn load_prompt_file(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(prompt) = load_prompt_file(path) {
            self.config.system_prompt = prompt;
        }
        self
    }
}

/// Load a prompt file, returning None if not found or empty.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
