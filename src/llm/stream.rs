//! Streaming completion types
//!
//! A streamed completion is produced by a single background task into two
//! channels: incremental chunks and at most one terminal error. Both channels
//! close when the producer finishes.

use crate::llm::provider::{FinishReason, LlmError};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Buffer size of the chunk channel
pub const CHUNK_CHANNEL_CAPACITY: usize = 16;

/// One fragment of a tool call carried by a stream chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallChunk {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// Incremental content of a stream chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallChunk>,
}

/// A single streamed completion chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub id: String,
    pub model: String,
    pub delta: ChunkDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    pub fn is_terminal(&self) -> bool {
        self.finish_reason.is_some()
    }
}

/// Sending half handed to the producer task
#[derive(Debug)]
pub struct StreamSender {
    pub chunks: mpsc::Sender<StreamChunk>,
    pub errors: mpsc::Sender<LlmError>,
}

/// Receiving half of a streamed completion
///
/// Consume it either through the two raw receivers (`into_parts`) or as a
/// `Stream` of `Result<StreamChunk, LlmError>` that yields every chunk and
/// then the terminal error, if one was sent.
#[derive(Debug)]
pub struct CompletionStream {
    chunks: mpsc::Receiver<StreamChunk>,
    errors: mpsc::Receiver<LlmError>,
    chunks_done: bool,
}

impl CompletionStream {
    /// Create a connected sender/stream pair
    pub fn channel() -> (StreamSender, Self) {
        let (chunk_tx, chunk_rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);
        let (error_tx, error_rx) = mpsc::channel(1);
        (
            StreamSender {
                chunks: chunk_tx,
                errors: error_tx,
            },
            Self {
                chunks: chunk_rx,
                errors: error_rx,
                chunks_done: false,
            },
        )
    }

    /// Split into the chunk and error receivers
    pub fn into_parts(self) -> (mpsc::Receiver<StreamChunk>, mpsc::Receiver<LlmError>) {
        (self.chunks, self.errors)
    }

    /// Drain the stream, returning every chunk or the terminal error
    pub async fn collect_chunks(self) -> Result<Vec<StreamChunk>, LlmError> {
        let (mut chunks, mut errors) = self.into_parts();
        let mut collected = Vec::new();
        while let Some(chunk) = chunks.recv().await {
            collected.push(chunk);
        }
        match errors.recv().await {
            Some(error) => Err(error),
            None => Ok(collected),
        }
    }
}

impl Stream for CompletionStream {
    type Item = Result<StreamChunk, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if !this.chunks_done {
            match this.chunks.poll_recv(cx) {
                Poll::Ready(Some(chunk)) => return Poll::Ready(Some(Ok(chunk))),
                Poll::Ready(None) => this.chunks_done = true,
                Poll::Pending => return Poll::Pending,
            }
        }

        this.errors.poll_recv(cx).map(|error| error.map(Err))
    }
}

/// Concatenate the text content carried by a sequence of chunks
pub fn concat_content(chunks: &[StreamChunk]) -> String {
    chunks
        .iter()
        .filter_map(|chunk| chunk.delta.content.as_deref())
        .collect()
}
