//! Error types for tool operations.

use thiserror::Error;

/// Errors that can occur while declaring, validating or running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Arguments did not satisfy the tool's declared parameter schema.
    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The provider answered, but not with what we asked for.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}
