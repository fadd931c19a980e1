//! Builtin tools for the mock agent
//!
//! Each tool has its own module with pure argument parsing and result
//! formatting kept apart from the handler body.

pub mod args;
pub mod delay;
pub mod echo;
pub mod error;
pub mod random_data;
pub mod validate;

use crate::tools::{Tool, ToolError};

pub use delay::DelayTool;
pub use echo::EchoTool;
pub use error::ErrorTool;
pub use random_data::RandomDataTool;
pub use validate::ValidateTool;

/// Names of every builtin tool
pub const BUILTIN_TOOLS: [&str; 5] = ["echo", "delay", "error", "validate", "random_data"];

/// Create builtin tool instances
pub fn create_builtin_tool(tool_name: &str) -> Result<Box<dyn Tool>, ToolError> {
    match tool_name {
        "echo" => Ok(Box::new(EchoTool::new())),
        "delay" => Ok(Box::new(DelayTool::new())),
        "error" => Ok(Box::new(ErrorTool::new())),
        "validate" => Ok(Box::new(ValidateTool::new())),
        "random_data" => Ok(Box::new(RandomDataTool::new())),
        _ => Err(ToolError::UnknownTool(tool_name.to_string())),
    }
}
