//! Error tool implementation
//!
//! Always fails, so callers can exercise their error propagation paths.

use crate::tools::builtin::args::{optional_str, required_str};
use crate::tools::{SimulatedErrorKind, Tool, ToolContext, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Error tool - builtin implementation
#[derive(Debug, Default)]
pub struct ErrorTool;

impl ErrorTool {
    pub fn new() -> Self {
        Self
    }

    /// Message used when the caller supplies none
    fn default_message(kind: SimulatedErrorKind) -> &'static str {
        match kind {
            SimulatedErrorKind::Validation => "Validation failed: invalid input format",
            SimulatedErrorKind::Timeout => "Operation timed out after 30 seconds",
            SimulatedErrorKind::Internal => "Internal server error occurred",
            SimulatedErrorKind::NotFound => "Resource not found",
        }
    }

    /// Build the simulated failure for the given arguments (pure function)
    fn simulate(error_type: &str, message: Option<&str>) -> ToolError {
        let Some(kind) = SimulatedErrorKind::parse(error_type) else {
            return ToolError::InvalidArgument(
                "unknown error_type: must be one of (validation, timeout, internal, not_found)"
                    .to_string(),
            );
        };

        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| Self::default_message(kind));

        ToolError::Simulated {
            kind,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Tool for ErrorTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "error".to_string(),
            description: "Simulate error conditions for testing error handling".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "error_type": {
                        "type": "string",
                        "description": "One of: validation, timeout, internal, not_found"
                    },
                    "message": {
                        "type": "string",
                        "description": "Custom error message"
                    }
                },
                "required": ["error_type"]
            }),
        }
    }

    async fn execute(&self, parameters: &Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let error_type = required_str(parameters, "error_type")?;
        let message = optional_str(parameters, "message")?;
        Err(Self::simulate(error_type, message))
    }
}
