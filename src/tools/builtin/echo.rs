//! Echo tool implementation
//!
//! Echoes the input message back; useful for basic connectivity tests.

use crate::tools::builtin::args::required_str;
use crate::tools::{Tool, ToolContext, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Echo tool - builtin implementation
#[derive(Debug, Default)]
pub struct EchoTool;

impl EchoTool {
    pub fn new() -> Self {
        Self
    }

    /// Format echo response (pure function)
    fn format_response(message: &str, timestamp: i64) -> Value {
        json!({
            "status": "success",
            "echo": message,
            "length": message.len(),
            "timestamp": timestamp
        })
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "echo".to_string(),
            description: "Echo back the input message (useful for basic connectivity tests)"
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "Message to echo back"
                    }
                },
                "required": ["message"]
            }),
        }
    }

    async fn execute(&self, parameters: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let message = required_str(parameters, "message")?;
        Ok(Self::format_response(message, ctx.timestamp))
    }
}
