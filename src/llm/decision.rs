//! Response decision for the mock completion engine
//!
//! `decide` is the whole brain of the mock model: a pure function from a
//! conversation and the offered tools to either a text reply or a tool
//! invocation. Both the blocking and the streaming entry points go through
//! it, so they always agree on what to answer.

use crate::llm::provider::{LlmError, Message, MessageRole, ToolCall};
use crate::llm::synthesis::synthesize_tool_call;
use crate::tools::ToolDescription;
use tracing::debug;

/// What the mock model answers with
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    TextReply(String),
    ToolInvocation(Vec<ToolCall>),
}

/// Facts gathered from one pass over the conversation
#[derive(Debug, Default, PartialEq)]
pub struct ConversationScan<'a> {
    /// Content of the most recent user message
    pub user_message: Option<&'a str>,
    pub has_tool_results: bool,
    /// Content of the most recent tool result that looks like a failure
    pub tool_error: Option<&'a str>,
}

impl<'a> ConversationScan<'a> {
    pub fn of(messages: &'a [Message]) -> Self {
        let mut scan = Self::default();
        for message in messages {
            match message.role {
                MessageRole::User => scan.user_message = Some(&message.content),
                MessageRole::Tool => {
                    scan.has_tool_results = true;
                    if reports_failure(&message.content) {
                        scan.tool_error = Some(&message.content);
                    }
                }
                MessageRole::System | MessageRole::Assistant => {}
            }
        }
        scan
    }
}

/// Whether a tool result reads like a failure.
///
/// Best effort: a plain case-insensitive search for "error" or "failed", so a
/// successful result that merely mentions either word is treated as failed
/// too.
pub fn reports_failure(content: &str) -> bool {
    let lower = content.to_lowercase();
    lower.contains("error") || lower.contains("failed")
}

/// Wrap text in the fixed mock reply template
pub fn mock_reply(text: &str) -> String {
    format!("This is a mock response to: {text:?}. I'm a mock agent designed for testing purposes.")
}

/// Acknowledgment sent once a tool result is in the history
pub fn completion_acknowledgment(user_message: &str) -> String {
    format!(
        "Task completed successfully. I executed the requested operation based on: {user_message}"
    )
}

/// Decide how the mock model responds to `messages` given the offered `tools`.
///
/// In priority order: empty input fails, a failed tool result fails the call,
/// offered tools without a prior tool result produce exactly one tool call,
/// and everything else gets a templated text reply.
pub fn decide(messages: &[Message], tools: &[ToolDescription]) -> Result<Decision, LlmError> {
    let last = messages.last().ok_or(LlmError::EmptyInput)?;
    let scan = ConversationScan::of(messages);

    if let Some(content) = scan.tool_error {
        debug!(tool_result = %content, "Propagating failed tool result");
        return Err(LlmError::ToolExecutionFailed(content.to_string()));
    }

    if !scan.has_tool_results {
        if let Some(call) = synthesize_tool_call(tools, &last.content) {
            debug!(tool = %call.name, call_id = %call.id, "Synthesized tool call");
            return Ok(Decision::ToolInvocation(vec![call]));
        }
    }

    let subject = match scan.user_message {
        Some(user_message) if scan.has_tool_results && !user_message.is_empty() => {
            completion_acknowledgment(user_message)
        }
        _ => last.content.clone(),
    };

    debug!(
        messages = messages.len(),
        has_tool_results = scan.has_tool_results,
        "Generating text reply"
    );
    Ok(Decision::TextReply(mock_reply(&subject)))
}
