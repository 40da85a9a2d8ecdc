//! Prompt helpers.

use sha2::{Digest, Sha256};

/// System prompt used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Keep your response short.";

/// Compute a stable SHA-256 fingerprint for a prompt string.
///
/// Logged at startup so deployments can tell which prompt is live without
/// printing it.
pub fn hash_prompt(prompt: &str) -> String {
    Sha256::digest(prompt.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
