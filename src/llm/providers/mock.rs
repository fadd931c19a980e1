//! Mock provider implementation
//!
//! Simulates chat completion without contacting any model. Responses come
//! from [`decide`]; token usage and timestamps are fixed placeholders.

use crate::llm::decision::{decide, Decision};
use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, TokenUsage,
    ToolCall,
};
use crate::llm::stream::{ChunkDelta, CompletionStream, StreamChunk, StreamSender, ToolCallChunk};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

/// Fixed creation timestamp reported on every response
pub const MOCK_CREATED: i64 = 1_234_567_890;

/// Placeholder usage reported on every response
pub const MOCK_USAGE: TokenUsage = TokenUsage {
    prompt_tokens: 100,
    completion_tokens: 50,
    total_tokens: 150,
};

/// Mock provider configuration
#[derive(Debug, Clone)]
pub struct MockLlmConfig {
    /// Model label reported on responses
    pub model: String,
    /// Characters per streamed text chunk
    pub stream_chunk_size: usize,
}

impl Default for MockLlmConfig {
    fn default() -> Self {
        Self {
            model: "mock-model".to_string(),
            stream_chunk_size: 16,
        }
    }
}

/// Mock provider implementation
#[derive(Debug, Clone, Default)]
pub struct MockLlmProvider {
    config: MockLlmConfig,
}

impl MockLlmProvider {
    /// Create a new mock provider
    pub fn new(config: MockLlmConfig) -> Result<Self, LlmError> {
        if config.stream_chunk_size == 0 {
            return Err(LlmError::InvalidRequest(
                "stream_chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &MockLlmConfig {
        &self.config
    }

    /// Build the blocking response for a decision (pure function)
    fn build_response(&self, decision: Decision) -> CompletionResponse {
        let (content, tool_calls, finish_reason) = match decision {
            Decision::TextReply(text) => (text, Vec::new(), FinishReason::Stop),
            Decision::ToolInvocation(calls) => (String::new(), calls, FinishReason::ToolCalls),
        };

        CompletionResponse {
            id: format!("mock-{}", Uuid::new_v4().simple()),
            content,
            model: self.config.model.clone(),
            created: MOCK_CREATED,
            usage: MOCK_USAGE,
            finish_reason,
            tool_calls,
        }
    }

    /// Build the ordered chunk sequence for a decision (pure function)
    ///
    /// The last element is always the single terminal chunk.
    pub fn build_chunks(&self, decision: Decision) -> Vec<StreamChunk> {
        let mut chunks = Vec::new();
        let finish_reason = match decision {
            Decision::ToolInvocation(calls) => {
                for (index, call) in calls.into_iter().enumerate() {
                    chunks.push(self.chunk(ChunkDelta {
                        content: None,
                        tool_call: Some(tool_call_chunk(index, call)),
                    }));
                }
                FinishReason::ToolCalls
            }
            Decision::TextReply(text) => {
                for piece in split_chunks(&text, self.config.stream_chunk_size) {
                    chunks.push(self.chunk(ChunkDelta {
                        content: Some(piece.to_string()),
                        tool_call: None,
                    }));
                }
                FinishReason::Stop
            }
        };

        let mut terminal = self.chunk(ChunkDelta::default());
        terminal.finish_reason = Some(finish_reason);
        chunks.push(terminal);
        chunks
    }

    fn chunk(&self, delta: ChunkDelta) -> StreamChunk {
        StreamChunk {
            id: format!("mock-stream-{}", Uuid::new_v4().simple()),
            model: self.config.model.clone(),
            delta,
            finish_reason: None,
        }
    }

    /// Producer body of a streamed completion.
    ///
    /// Returning drops `sender`, which closes both channels.
    async fn produce(
        self,
        request: CompletionRequest,
        sender: StreamSender,
        cancel: CancellationToken,
    ) {
        let chunks = match decide(&request.messages, &request.tools) {
            Ok(decision) => self.build_chunks(decision),
            Err(error) => {
                debug!(error = %error, "Streaming completion failed");
                let _ = sender.errors.send(error).await;
                return;
            }
        };

        for chunk in chunks {
            if cancel.is_cancelled() {
                debug!("Streaming completion cancelled");
                let _ = sender.errors.send(LlmError::Cancelled).await;
                return;
            }
            let sent = tokio::select! {
                result = sender.chunks.send(chunk) => result.is_ok(),
                _ = cancel.cancelled() => {
                    let _ = sender.errors.send(LlmError::Cancelled).await;
                    return;
                }
            };
            if !sent {
                warn!("Stream consumer dropped before completion finished");
                return;
            }
        }
    }
}

fn tool_call_chunk(index: usize, call: ToolCall) -> ToolCallChunk {
    ToolCallChunk {
        index,
        id: call.id,
        name: call.name,
        arguments: call.arguments,
    }
}

/// Split `text` into pieces of at most `width` characters (pure function)
///
/// Splits on char boundaries, so multi-byte text is never cut mid-character.
pub fn split_chunks(text: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == width {
            pieces.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn available_models(&self) -> Vec<String> {
        vec![self.config.model.clone()]
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let decision = decide(&request.messages, &request.tools)?;
        let response = self.build_response(decision);
        debug!(
            response_id = %response.id,
            tool_calls = response.tool_calls.len(),
            content_length = response.content.len(),
            "Mock completion generated"
        );
        Ok(response)
    }

    fn complete_stream(
        &self,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> CompletionStream {
        let (sender, stream) = CompletionStream::channel();
        let span = crate::completion_span!(
            stream = true,
            messages = request.messages.len(),
            tools = request.tools.len()
        );
        tokio::spawn(self.clone().produce(request, sender, cancel).instrument(span));
        stream
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}
