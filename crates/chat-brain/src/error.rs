//! Error types for the chat brain.

use agent_tools::ToolError;
use thiserror::Error;

/// Errors that can occur while producing a reply.
///
/// None of these reach the user: [`crate::ChatOrchestrator::respond`] logs
/// them and answers with [`crate::FALLBACK_MESSAGE`].
#[derive(Debug, Error)]
pub enum BrainError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The model endpoint could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The model endpoint answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The completion did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Tool-call arguments were not valid JSON.
    #[error("could not decode arguments for '{tool}': {source}")]
    ArgumentDecode {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    /// The registry refused a tool call (unknown name or bad arguments).
    #[error("tool dispatch failed: {0}")]
    Tool(#[from] ToolError),
}
