//! Tool system for the mock agent
//!
//! Every tool implements the `Tool` trait: a JSON-schema description and an
//! async handler taking the argument object plus a `ToolContext`. Tools live
//! in a name-keyed `ToolSystem` registry that validates arguments against the
//! schema before dispatching.

use crate::config::ToolConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Instrument};

pub mod builtin;

/// Tool interface
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and JSON schema of the parameters
    fn describe(&self) -> ToolDescription;

    /// Receives the tool's `config` table from the configuration file.
    /// Called once before the tool is registered.
    async fn initialize(&mut self, _config: Option<&Value>) -> Result<(), ToolError> {
        Ok(())
    }

    /// Run the tool with parameters matching the schema from `describe()`
    async fn execute(&self, parameters: &Value, ctx: &ToolContext) -> Result<Value, ToolError>;

    /// Release resources held by the tool
    async fn shutdown(&mut self) -> Result<(), ToolError> {
        Ok(())
    }
}

/// Tool description handed to the model with each request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Per-invocation context passed to every tool
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Cancelled by the caller to abort long-running tools
    pub cancel: CancellationToken,
    /// Unix timestamp (seconds) of the invocation
    pub timestamp: i64,
}

impl ToolContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

/// Tool system for managing and executing tools
pub struct ToolSystem {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolSystem {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry holding every builtin tool with default settings
    pub fn with_builtin_tools() -> Self {
        let mut system = Self::new();
        for name in builtin::BUILTIN_TOOLS {
            if let Ok(tool) = builtin::create_builtin_tool(name) {
                system.register(tool);
            }
        }
        system
    }

    /// Initialize tool system from the `[tools]` configuration table
    pub async fn initialize(
        &mut self,
        tool_configs: &HashMap<String, ToolConfig>,
    ) -> Result<(), ToolError> {
        for (tool_name, tool_config) in tool_configs {
            let mut tool = Self::create_tool(tool_name, tool_config)?;

            let config = match tool_config {
                ToolConfig::Simple(_) => None,
                ToolConfig::Complex { config, .. } => Some(
                    serde_json::to_value(config)
                        .map_err(|e| ToolError::InitializationError(e.to_string()))?,
                ),
            };

            tool.initialize(config.as_ref()).await?;
            debug!(tool = %tool_name, "Tool initialized");

            self.tools.insert(tool_name.clone(), tool);
        }

        Ok(())
    }

    /// Create tool instance based on configuration
    fn create_tool(tool_name: &str, config: &ToolConfig) -> Result<Box<dyn Tool>, ToolError> {
        match config.implementation() {
            "builtin" => builtin::create_builtin_tool(tool_name),
            other => Err(ToolError::UnknownImplementation(other.to_string())),
        }
    }

    /// Register a tool under the name from its description, replacing any
    /// tool already registered under that name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.describe().name;
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "Replaced previously registered tool");
        }
    }

    /// Descriptions of all registered tools, sorted by name
    pub fn descriptions(&self) -> Vec<ToolDescription> {
        let mut descriptions: Vec<_> = self.tools.values().map(|tool| tool.describe()).collect();
        descriptions.sort_by(|a, b| a.name.cmp(&b.name));
        descriptions
    }

    /// Execute tool with validated parameters
    pub async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: &Value,
        ctx: &ToolContext,
    ) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        Self::validate_parameters(&tool.describe(), parameters)?;

        let span = crate::tool_span!(tool = %tool_name);
        let result = tool.execute(parameters, ctx).instrument(span).await;
        match &result {
            Ok(_) => debug!(tool = %tool_name, "Tool completed"),
            Err(e) => debug!(tool = %tool_name, error = %e, "Tool failed"),
        }
        result
    }

    /// Execute a tool and serialize its result to the JSON text handed back
    /// to the framework
    pub async fn invoke(
        &self,
        tool_name: &str,
        parameters: &Value,
        ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let value = self.execute_tool(tool_name, parameters, ctx).await?;
        serde_json::to_string(&value).map_err(|e| ToolError::ExecutionError(e.to_string()))
    }

    /// Validate parameters against the tool's JSON schema
    fn validate_parameters(
        description: &ToolDescription,
        parameters: &Value,
    ) -> Result<(), ToolError> {
        let validator = jsonschema::validator_for(&description.parameters)
            .map_err(|e| ToolError::SchemaError(format!("Schema compilation error: {e}")))?;

        validator.validate(parameters).map_err(|errors| {
            let error_messages: Vec<String> = errors
                .map(|e| format!("At '{}': {}", e.instance_path, e))
                .collect();
            ToolError::ValidationError(error_messages.join("; "))
        })
    }

    /// Get list of available tools, sorted by name
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Shutdown all tools
    pub async fn shutdown(&mut self) -> Result<(), ToolError> {
        for tool in self.tools.values_mut() {
            tool.shutdown().await?;
        }
        Ok(())
    }
}

impl Default for ToolSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure kinds the `error` tool simulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatedErrorKind {
    Validation,
    Timeout,
    Internal,
    NotFound,
}

impl SimulatedErrorKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "validation" => Some(Self::Validation),
            "timeout" => Some(Self::Timeout),
            "internal" => Some(Self::Internal),
            "not_found" => Some(Self::NotFound),
            _ => None,
        }
    }
}

impl fmt::Display for SimulatedErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validation => "validation",
            Self::Timeout => "timeout",
            Self::Internal => "internal",
            Self::NotFound => "not found",
        })
    }
}

/// Tool system errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown tool implementation: {0}")]
    UnknownImplementation(String),
    #[error("Tool initialization failed: {0}")]
    InitializationError(String),
    #[error("Parameter validation failed: {0}")]
    ValidationError(String),
    #[error("Schema error: {0}")]
    SchemaError(String),
    /// A handler rejected a missing, mistyped or out-of-range argument
    #[error("{0}")]
    InvalidArgument(String),
    /// Failure produced on purpose by the `error` tool
    #[error("{kind} error: {message}")]
    Simulated {
        kind: SimulatedErrorKind,
        message: String,
    },
    #[error("{0}")]
    Cancelled(String),
    #[error("Tool execution failed: {0}")]
    ExecutionError(String),
}
