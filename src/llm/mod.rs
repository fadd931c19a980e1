//! Mock LLM backend for the agent framework
//!
//! This module provides the chat-completion capability: provider-agnostic
//! types and trait, the pure response decision, tool call synthesis, and the
//! mock provider with blocking and streaming entry points.

pub mod decision;
pub mod provider;
pub mod providers;
pub mod stream;
pub mod synthesis;

pub use decision::{decide, Decision};
pub use provider::*;
pub use providers::*;
pub use stream::{ChunkDelta, CompletionStream, StreamChunk, ToolCallChunk};
