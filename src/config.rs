//! Configuration system for the mock agent
//!
//! Loaded from a TOML file. Every section except `[agent]` is optional. When
//! `[tools]` is omitted all builtin tools are registered; an empty `[tools]`
//! table registers none.

use crate::llm::providers::MockLlmConfig;
use crate::tools::builtin::BUILTIN_TOOLS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MockAgentConfig {
    pub agent: AgentSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default = "default_tools")]
    pub tools: HashMap<String, ToolConfig>,
    #[serde(default)]
    pub budget: BudgetConfig,
}

/// Agent section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSection {
    /// Agent identifier (must match [a-zA-Z0-9._-]+)
    pub id: String,
    /// Description of what this agent does
    #[serde(default)]
    pub description: String,
}

/// Mock LLM section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmSection {
    /// Model label reported on every response
    #[serde(default = "default_model")]
    pub model: String,
    /// Characters per streamed text chunk
    #[serde(default = "default_stream_chunk_size")]
    pub stream_chunk_size: usize,
    /// Optional system prompt placed at the head of each conversation
    pub system_prompt: Option<String>,
}

fn default_model() -> String {
    "mock-model".to_string()
}

fn default_stream_chunk_size() -> usize {
    16
}

fn default_tools() -> HashMap<String, ToolConfig> {
    BUILTIN_TOOLS
        .iter()
        .map(|name| (name.to_string(), ToolConfig::Simple("builtin".to_string())))
        .collect()
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            stream_chunk_size: default_stream_chunk_size(),
            system_prompt: None,
        }
    }
}

impl LlmSection {
    /// Provider settings derived from this section
    pub fn provider_config(&self) -> MockLlmConfig {
        MockLlmConfig {
            model: self.model.clone(),
            stream_chunk_size: self.stream_chunk_size,
        }
    }
}

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ToolConfig {
    /// Simple form: tool_name = "identifier"
    Simple(String),
    /// Complex form: tool_name = { impl = "identifier", config = { ... } }
    Complex {
        #[serde(rename = "impl")]
        implementation: String,
        #[serde(default)]
        config: HashMap<String, serde_json::Value>,
    },
}

impl ToolConfig {
    /// Implementation identifier, e.g. "builtin"
    pub fn implementation(&self) -> &str {
        match self {
            ToolConfig::Simple(implementation) => implementation,
            ToolConfig::Complex { implementation, .. } => implementation,
        }
    }
}

/// Budget configuration for the tool loop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetConfig {
    /// Maximum number of model turns per conversation
    pub max_iterations: u32,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self { max_iterations: 8 }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid agent ID format: {0}")]
    InvalidAgentId(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Default for MockAgentConfig {
    fn default() -> Self {
        Self {
            agent: AgentSection {
                id: "mock-agent".to_string(),
                description: "Mock agent for exercising agent frameworks".to_string(),
            },
            llm: LlmSection::default(),
            tools: default_tools(),
            budget: BudgetConfig::default(),
        }
    }
}

impl MockAgentConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MockAgentConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_agent_id(&self.agent.id)?;

        if self.llm.stream_chunk_size == 0 {
            return Err(ConfigError::InvalidConfig(
                "llm.stream_chunk_size must be greater than zero".to_string(),
            ));
        }

        if self.budget.max_iterations == 0 {
            return Err(ConfigError::InvalidConfig(
                "budget.max_iterations must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validate agent ID format
fn validate_agent_id(agent_id: &str) -> Result<(), ConfigError> {
    let valid_chars = agent_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if agent_id.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidAgentId(format!(
            "Agent ID '{agent_id}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let toml_content = r#"
[agent]
id = "test-agent"
description = "A test agent"

[llm]
model = "mock-large"
stream_chunk_size = 8
system_prompt = "You are a mock."

[tools]
echo = "builtin"
delay = { impl = "builtin", config = { max_duration_seconds = 30 } }

[budget]
max_iterations = 4
"#;

        let config = MockAgentConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.agent.id, "test-agent");
        assert_eq!(config.llm.model, "mock-large");
        assert_eq!(config.llm.stream_chunk_size, 8);
        assert_eq!(config.llm.system_prompt.as_deref(), Some("You are a mock."));
        assert_eq!(config.tools.len(), 2);
        assert_eq!(config.tools["delay"].implementation(), "builtin");
        assert_eq!(config.budget.max_iterations, 4);
    }

    #[test]
    fn test_minimal_config() {
        let config = MockAgentConfig::from_toml_str("[agent]\nid = \"minimal\"\n").unwrap();
        assert_eq!(config.agent.id, "minimal");
        assert_eq!(config.llm, LlmSection::default());
        assert_eq!(config.tools, default_tools());
        assert_eq!(config.budget.max_iterations, 8);
    }

    #[test]
    fn test_empty_tools_table_registers_nothing() {
        let config =
            MockAgentConfig::from_toml_str("[agent]\nid = \"quiet\"\n\n[tools]\n").unwrap();
        assert!(config.tools.is_empty());
    }

    #[test]
    fn test_default_config_registers_builtins() {
        let config = MockAgentConfig::default();
        assert!(config.validate().is_ok());
        for name in BUILTIN_TOOLS {
            assert!(config.tools.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn test_invalid_agent_id() {
        assert!(validate_agent_id("invalid@agent").is_err());
        assert!(validate_agent_id("").is_err());
        assert!(validate_agent_id("valid-agent_123.test").is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = MockAgentConfig::from_toml_str(
            "[agent]\nid = \"a\"\n[llm]\nstream_chunk_size = 0\n",
        );
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_provider_config_from_section() {
        let section = LlmSection {
            model: "m".to_string(),
            stream_chunk_size: 3,
            system_prompt: None,
        };
        let provider = section.provider_config();
        assert_eq!(provider.model, "m");
        assert_eq!(provider.stream_chunk_size, 3);
    }
}
