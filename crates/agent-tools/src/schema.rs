//! Validation of model-supplied arguments against a tool's declared schema.

use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use serde_json::Value;

use crate::error::ToolError;
use crate::tool::ToolKind;

/// Compiled parameter schemas, one per [`ToolKind`], built once and shared.
#[derive(Clone)]
pub struct ArgumentValidator {
    weather: Arc<Validator>,
    exchange_rate: Arc<Validator>,
}

impl ArgumentValidator {
    /// Compile the parameter schema of every tool.
    pub fn new() -> Result<Self, ToolError> {
        Ok(Self {
            weather: compile(ToolKind::Weather)?,
            exchange_rate: compile(ToolKind::ExchangeRate)?,
        })
    }

    /// Check `arguments` against the parameter schema of `kind`.
    ///
    /// All violations are reported together, joined with `"; "`.
    pub fn validate(&self, kind: ToolKind, arguments: &Value) -> Result<(), ToolError> {
        let validator = match kind {
            ToolKind::Weather => &self.weather,
            ToolKind::ExchangeRate => &self.exchange_rate,
        };

        let errors: Vec<String> = validator
            .iter_errors(arguments)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ToolError::InvalidArguments {
                tool: kind.name().to_string(),
                reason: errors.join("; "),
            })
        }
    }
}

impl fmt::Debug for ArgumentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentValidator").finish_non_exhaustive()
    }
}

fn compile(kind: ToolKind) -> Result<Arc<Validator>, ToolError> {
    let schema = kind.parameters();
    let validator = jsonschema::validator_for(&schema).map_err(|e| {
        ToolError::ExecutionFailed(format!("invalid parameter schema for {}: {e}", kind.name()))
    })?;
    Ok(Arc::new(validator))
}
