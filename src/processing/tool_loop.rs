//! Tool loop driver
//!
//! Sends the conversation to the provider, executes any requested tool
//! calls, appends their results as `tool` messages and asks again, until
//! the provider answers with text or the iteration budget runs out.

use crate::error::{AgentError, AgentResult};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider, Message, ToolCall};
use crate::tools::{ToolContext, ToolSystem};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of a finished tool loop
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// Final text answer of the model
    pub response: String,
    /// Number of model turns taken
    pub iterations: u32,
    /// Number of tool calls executed
    pub tool_calls: usize,
    /// Full conversation, including tool results
    pub messages: Vec<Message>,
}

/// Drives a conversation between a provider and a tool registry
pub struct ToolLoop {
    llm_provider: Arc<dyn LlmProvider>,
    tool_system: Arc<ToolSystem>,
    max_iterations: u32,
    system_prompt: Option<String>,
}

impl ToolLoop {
    pub fn new(
        llm_provider: Arc<dyn LlmProvider>,
        tool_system: Arc<ToolSystem>,
        max_iterations: u32,
    ) -> Self {
        Self {
            llm_provider,
            tool_system,
            max_iterations,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    /// Build the opening conversation (pure function)
    pub fn build_initial_messages(&self, user_input: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = &self.system_prompt {
            messages.push(Message::system(prompt.clone()));
        }
        messages.push(Message::user(user_input));
        messages
    }

    /// Run the loop for a single user input
    #[tracing::instrument(name = "tool_loop", skip(self, cancel), fields(provider = %self.llm_provider.name()))]
    pub async fn run(&self, user_input: &str, cancel: &CancellationToken) -> AgentResult<LoopOutcome> {
        if user_input.trim().is_empty() {
            return Err(AgentError::invalid_input("user input must not be empty"));
        }

        let tools = self.tool_system.descriptions();
        let mut messages = self.build_initial_messages(user_input);
        let mut tool_calls = 0;
        let mut iteration = 0;

        loop {
            iteration += 1;
            Self::check_iteration_limit(iteration, self.max_iterations)?;

            let request = CompletionRequest::new(messages.clone(), tools.clone());
            let response = self.llm_provider.complete(request).await?;
            debug!(
                iteration,
                response_id = %response.id,
                tool_calls = response.tool_calls.len(),
                "Received completion"
            );

            if !response.has_tool_calls() {
                info!(iterations = iteration, tool_calls, "Tool loop completed");
                messages.push(Message::assistant(response.content.clone()));
                return Ok(LoopOutcome {
                    response: response.content,
                    iterations: iteration,
                    tool_calls,
                    messages,
                });
            }

            Self::add_assistant_response(&mut messages, &response);
            for call in &response.tool_calls {
                let result = self.execute_tool_call(call, cancel).await?;
                messages.push(result);
                tool_calls += 1;
            }
        }
    }

    /// Execute one tool call and turn the outcome into a `tool` message.
    ///
    /// Tool failures become message content for the model to react to;
    /// cancellation aborts the loop instead.
    async fn execute_tool_call(
        &self,
        call: &ToolCall,
        cancel: &CancellationToken,
    ) -> AgentResult<Message> {
        debug!(tool = %call.name, call_id = %call.id, arguments = %call.arguments, "Executing tool");

        let arguments = match call.parsed_arguments() {
            Ok(arguments) => arguments,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call arguments did not parse");
                return Ok(Message::tool(&call.id, format!("Tool {} failed: {e}", call.name)));
            }
        };

        let ctx = ToolContext::new(cancel.clone());
        match self.tool_system.invoke(&call.name, &arguments, &ctx).await {
            Ok(result) => Ok(Message::tool(&call.id, result)),
            Err(e) => {
                let error = AgentError::from(e);
                if error.is_cancelled() {
                    return Err(error);
                }
                warn!(tool = %call.name, error = %error, "Tool execution failed");
                Ok(Message::tool(&call.id, format!("Tool {} failed: {error}", call.name)))
            }
        }
    }

    /// Add the assistant's tool request to the conversation (pure function)
    fn add_assistant_response(messages: &mut Vec<Message>, response: &CompletionResponse) {
        messages.push(Message::assistant_tool_calls(response.tool_calls.clone()));
    }

    /// Check if iteration limit is exceeded (pure validation)
    fn check_iteration_limit(iteration: u32, max_iterations: u32) -> AgentResult<()> {
        if iteration > max_iterations {
            return Err(AgentError::IterationLimitExceeded {
                max: max_iterations,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::MockLlmProvider;
    use crate::llm::LlmError;

    fn mock_loop(max_iterations: u32) -> ToolLoop {
        ToolLoop::new(
            Arc::new(MockLlmProvider::default()),
            Arc::new(ToolSystem::with_builtin_tools()),
            max_iterations,
        )
    }

    #[test]
    fn test_initial_messages_with_system_prompt() {
        let tool_loop = mock_loop(4).with_system_prompt(Some("be brief".to_string()));
        let messages = tool_loop.build_initial_messages("hi");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::system("be brief"));
        assert_eq!(messages[1], Message::user("hi"));
    }

    #[test]
    fn test_iteration_limit() {
        assert!(ToolLoop::check_iteration_limit(3, 3).is_ok());
        assert!(matches!(
            ToolLoop::check_iteration_limit(4, 3),
            Err(AgentError::IterationLimitExceeded { max: 3 })
        ));
    }

    #[tokio::test]
    async fn test_echo_round_trip() {
        let outcome = mock_loop(4)
            .run("please echo hello", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.tool_calls, 1);
        assert!(outcome.response.contains("Task completed successfully"));
        assert!(outcome.response.contains("please echo hello"));
    }

    #[tokio::test]
    async fn test_error_tool_failure_propagates() {
        let result = mock_loop(4)
            .run("throw a timeout error", &CancellationToken::new())
            .await;

        match result {
            Err(AgentError::Llm(LlmError::ToolExecutionFailed(content))) => {
                assert!(content.contains("timeout error: throw a timeout error"));
            }
            other => panic!("expected propagated tool failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_iteration_budget_exhausted() {
        let result = mock_loop(1).run("echo me", &CancellationToken::new()).await;
        assert!(matches!(
            result,
            Err(AgentError::IterationLimitExceeded { max: 1 })
        ));
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let result = mock_loop(4).run("  ", &CancellationToken::new()).await;
        assert!(matches!(result, Err(AgentError::InvalidInput { .. })));
    }
}
