//! Top-level error type for the mock agent
//!
//! Each layer has its own error enum (`LlmError`, `ToolError`,
//! `ConfigError`); `AgentError` wraps them for code that drives several
//! layers at once, such as the tool loop and the CLI.

use crate::config::ConfigError;
use crate::llm::LlmError;
use crate::tools::ToolError;
use thiserror::Error;

/// Main error type for mock agent operations
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM provider error: {0}")]
    Llm(#[from] LlmError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Tool loop exceeded maximum iterations ({max})")]
    IterationLimitExceeded { max: u32 },
}

impl AgentError {
    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether the failure came from a cancellation rather than a fault
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            AgentError::Llm(LlmError::Cancelled) | AgentError::Tool(ToolError::Cancelled(_))
        )
    }
}

/// Result type for agent operations
pub type AgentResult<T> = Result<T, AgentError>;
