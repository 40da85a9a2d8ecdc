//! Conversation orchestration for the chat app.
//!
//! [`ChatOrchestrator`] turns a user's message plus their recent history into
//! a reply. It talks to an OpenAI-compatible chat completions API through the
//! [`ChatModel`] trait and runs the tools from [`agent_tools::ToolRegistry`]
//! when the model asks for them.
//!
//! # Features
//!
//! - One system prompt, a bounded window of history, then the new message
//! - Weather and exchange-rate tools, schema-checked before they run
//! - Structured follow-up answers when every invoked tool asks for one
//! - Never fails: errors are logged and answered with [`FALLBACK_MESSAGE`]
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use chat_brain::{ChatOrchestrator, ConversationTurn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = ChatOrchestrator::from_env()?;
//!
//!     let history = vec![ConversationTurn::user("Hi"), ConversationTurn::bot("Hello!")];
//!     let reply = orchestrator
//!         .respond(&history, "What's the USD to EUR rate?")
//!         .await;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod error;
mod history;
mod model;
mod orchestrator;
mod prompt;

#[cfg(test)]
mod test_support;

pub use api_types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, FunctionCall,
    JsonSchemaFormat, ResponseFormat, ToolCall, Usage, WeatherReport,
};
pub use config::{
    ChatBrainConfig, ChatBrainConfigBuilder, DEFAULT_API_URL, DEFAULT_PROMPT_FILE,
    DEFAULT_PRIMARY_MODEL, DEFAULT_SECONDARY_MODEL,
};
pub use error::BrainError;
pub use history::ConversationTurn;
pub use model::{ChatModel, OpenAiChatModel};
pub use orchestrator::{ChatOrchestrator, FALLBACK_MESSAGE};
pub use prompt::{hash_prompt, DEFAULT_SYSTEM_PROMPT};

// Re-exported so ChatModel implementors don't need their own dependency.
pub use async_trait::async_trait;
