//! Mock Agent - deterministic LLM backend for testing agent frameworks
//!
//! A stand-in for a real chat-completion model. Replies are derived from
//! keywords in the conversation, so an agent framework can exercise its
//! tool-calling, streaming, cancellation and error paths without network
//! access or nondeterministic output.
//!
//! # Overview
//!
//! - `llm`: the `LlmProvider` trait and the keyword-driven `MockLlmProvider`,
//!   with blocking and streaming completion
//! - `tools`: the `Tool` trait, the schema-validating `ToolSystem` registry and
//!   five builtin tools (echo, delay, error, validate, random_data)
//! - `processing`: a tool loop that feeds tool results back to the model
//! - `config`: TOML configuration
//!
//! # Quick Start
//!
//! ```rust
//! use mock_agent::llm::{CompletionRequest, LlmProvider, Message, MockLlmProvider};
//! use mock_agent::tools::ToolSystem;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockLlmProvider::default();
//! let tools = ToolSystem::with_builtin_tools();
//!
//! let request = CompletionRequest::new(
//!     vec![Message::user("please wait 3 seconds")],
//!     tools.descriptions(),
//! );
//! let response = provider.complete(request).await.unwrap();
//!
//! assert!(response.content.is_empty());
//! assert_eq!(response.tool_calls[0].name, "delay");
//! # }
//! ```

pub mod config;
pub mod error;
pub mod llm;
pub mod observability;
pub mod processing;
pub mod tools;

pub use config::{ConfigError, MockAgentConfig};
pub use error::{AgentError, AgentResult};
pub use llm::{LlmError, LlmProvider, MockLlmProvider};
pub use processing::{LoopOutcome, ToolLoop};
pub use tools::{Tool, ToolContext, ToolDescription, ToolError, ToolSystem};
