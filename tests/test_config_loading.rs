//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration loading, validation, and error handling.
//! We test observable outcomes, not implementation details of TOML parsing.

use mock_agent::config::{ConfigError, MockAgentConfig, ToolConfig};
use mock_agent::tools::ToolSystem;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{content}").unwrap();
    temp_file
}

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let temp_file = write_config(
        r#"
[agent]
id = "test-agent"
description = "A test agent"

[llm]
model = "mock-large"
stream_chunk_size = 4
system_prompt = "You are a mock."

[tools]
echo = "builtin"
validate = "builtin"

[budget]
max_iterations = 3
"#,
    );

    let config = MockAgentConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.agent.id, "test-agent");
    assert_eq!(config.agent.description, "A test agent");
    assert_eq!(config.llm.model, "mock-large");
    assert_eq!(config.llm.stream_chunk_size, 4);
    assert_eq!(config.llm.system_prompt.as_deref(), Some("You are a mock."));
    assert_eq!(config.tools.len(), 2);
    assert_eq!(config.budget.max_iterations, 3);
}

#[test]
fn test_config_applies_defaults_when_sections_omitted() {
    let temp_file = write_config(
        r#"
[agent]
id = "bare"
"#,
    );

    let config = MockAgentConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.agent.description, "");
    assert_eq!(config.llm.model, "mock-model");
    assert_eq!(config.llm.stream_chunk_size, 16);
    assert!(config.llm.system_prompt.is_none());
    assert_eq!(config.tools.len(), 5);
    assert_eq!(config.budget.max_iterations, 8);
}

#[tokio::test]
async fn test_config_without_tools_table_registers_all_builtins() {
    let temp_file = write_config(
        r#"
[agent]
id = "a"
"#,
    );

    let config = MockAgentConfig::load_from_file(temp_file.path()).unwrap();
    let mut tool_system = ToolSystem::new();
    tool_system.initialize(&config.tools).await.unwrap();

    let mut expected = ToolSystem::new();
    expected
        .initialize(&MockAgentConfig::default().tools)
        .await
        .unwrap();
    assert_eq!(
        tool_system.list_tools(),
        vec!["delay", "echo", "error", "random_data", "validate"]
    );
    assert_eq!(tool_system.list_tools(), expected.list_tools());
}

#[tokio::test]
async fn test_empty_tools_table_opts_out_of_builtins() {
    let temp_file = write_config(
        r#"
[agent]
id = "a"

[tools]
"#,
    );

    let config = MockAgentConfig::load_from_file(temp_file.path()).unwrap();
    let mut tool_system = ToolSystem::new();
    tool_system.initialize(&config.tools).await.unwrap();
    assert!(tool_system.list_tools().is_empty());
}

#[test]
fn test_config_loads_with_complex_tool() {
    let temp_file = write_config(
        r#"
[agent]
id = "test-agent"

[tools]
delay = { impl = "builtin", config = { max_duration_seconds = 5 } }
"#,
    );

    let config = MockAgentConfig::load_from_file(temp_file.path()).unwrap();

    match &config.tools["delay"] {
        ToolConfig::Complex {
            implementation,
            config,
        } => {
            assert_eq!(implementation, "builtin");
            assert_eq!(config["max_duration_seconds"], 5);
        }
        other => panic!("expected complex tool config, got {other:?}"),
    }
}

#[test]
fn test_config_returns_error_when_agent_section_missing() {
    let temp_file = write_config(
        r#"
[llm]
model = "mock-model"
"#,
    );

    let result = MockAgentConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_config_returns_error_for_invalid_toml_syntax() {
    let temp_file = write_config("[agent\nid = ");
    let result = MockAgentConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_config_returns_error_for_invalid_agent_id_with_special_chars() {
    let temp_file = write_config(
        r#"
[agent]
id = "agent with spaces!"
"#,
    );

    let result = MockAgentConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidAgentId(_))));
}

#[test]
fn test_config_returns_error_for_zero_budget() {
    let temp_file = write_config(
        r#"
[agent]
id = "agent"

[budget]
max_iterations = 0
"#,
    );

    let result = MockAgentConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_config_returns_error_when_file_not_found() {
    let result = MockAgentConfig::load_from_file(std::path::Path::new(
        "/nonexistent/path/mock-agent.toml",
    ));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = MockAgentConfig::default();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let parsed = MockAgentConfig::from_toml_str(&rendered).unwrap();
    assert_eq!(parsed, config);
}

#[tokio::test]
async fn test_loaded_tools_initialize_tool_system() {
    let temp_file = write_config(
        r#"
[agent]
id = "tools-agent"

[tools]
echo = "builtin"
delay = { impl = "builtin", config = { max_duration_seconds = 1 } }
random_data = "builtin"
"#,
    );

    let config = MockAgentConfig::load_from_file(temp_file.path()).unwrap();
    let mut tool_system = ToolSystem::new();
    tool_system.initialize(&config.tools).await.unwrap();

    assert_eq!(
        tool_system.list_tools(),
        vec!["delay", "echo", "random_data"]
    );
}
