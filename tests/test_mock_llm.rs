//! Behavior tests for the mock completion engine
//!
//! Covers both entry points: blocking completion and streaming completion,
//! including failure, cancellation and tool call synthesis.

use futures::StreamExt;
use mock_agent::llm::stream::concat_content;
use mock_agent::llm::{
    decide, CompletionRequest, Decision, FinishReason, LlmError, LlmProvider, Message,
    MockLlmConfig, MockLlmProvider,
};
use mock_agent::tools::{ToolDescription, ToolSystem};
use proptest::prelude::*;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

fn provider() -> MockLlmProvider {
    MockLlmProvider::default()
}

fn builtin_tools() -> Vec<ToolDescription> {
    ToolSystem::with_builtin_tools().descriptions()
}

fn tool(name: &str) -> ToolDescription {
    ToolDescription {
        name: name.to_string(),
        description: format!("{name} tool"),
        parameters: json!({"type": "object"}),
    }
}

#[tokio::test]
async fn test_blocking_completion_rejects_empty_conversation() {
    let result = provider()
        .complete(CompletionRequest::new(vec![], builtin_tools()))
        .await;
    assert_eq!(result.unwrap_err(), LlmError::EmptyInput);
}

#[tokio::test]
async fn test_stream_rejects_empty_conversation_with_single_error() {
    let stream = provider().complete_stream(
        CompletionRequest::new(vec![], builtin_tools()),
        CancellationToken::new(),
    );
    let (mut chunks, mut errors) = stream.into_parts();

    assert!(chunks.recv().await.is_none(), "no chunk may be emitted");
    assert_eq!(errors.recv().await, Some(LlmError::EmptyInput));
    assert_eq!(errors.recv().await, None);
}

#[tokio::test]
async fn test_failed_tool_result_is_propagated() {
    let messages = vec![
        Message::user("throw an error"),
        Message::tool("call-1", "internal error: Internal server error"),
    ];
    let result = provider()
        .complete(CompletionRequest::new(messages, builtin_tools()))
        .await;

    match result {
        Err(LlmError::ToolExecutionFailed(content)) => {
            assert!(content.contains("internal error: Internal server error"));
        }
        other => panic!("expected tool execution failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_tools_without_results_yield_one_call_and_no_text() {
    let response = provider()
        .complete(CompletionRequest::new(
            vec![Message::user("wait 5 seconds")],
            builtin_tools(),
        ))
        .await
        .unwrap();

    assert!(response.content.is_empty());
    assert_eq!(response.finish_reason, FinishReason::ToolCalls);
    assert_eq!(response.tool_calls.len(), 1);

    let call = &response.tool_calls[0];
    assert_eq!(call.name, "delay");
    assert!(call.id.starts_with("call-"));
    let arguments: Value = call.parsed_arguments().unwrap();
    assert_eq!(arguments["duration_seconds"], 5.0);
}

#[tokio::test]
async fn test_blocking_response_shape() {
    let response = provider()
        .complete(CompletionRequest::new(vec![Message::user("Hello")], vec![]))
        .await
        .unwrap();

    assert!(response.id.starts_with("mock-"));
    assert_eq!(response.model, "mock-model");
    assert_eq!(response.created, 1_234_567_890);
    assert_eq!(response.usage.prompt_tokens, 100);
    assert_eq!(response.usage.completion_tokens, 50);
    assert_eq!(response.usage.total_tokens, 150);
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert!(response.content.contains("Hello"));
}

#[tokio::test]
async fn test_acknowledgment_after_successful_tool_result() {
    let messages = vec![
        Message::user("echo the word banana"),
        Message::tool("call-1", r#"{"echo":"banana","status":"success"}"#),
    ];
    let response = provider()
        .complete(CompletionRequest::new(messages, builtin_tools()))
        .await
        .unwrap();

    assert!(response.tool_calls.is_empty());
    assert!(response.content.contains("Task completed successfully"));
    assert!(response.content.contains("echo the word banana"));
}

#[tokio::test]
async fn test_stream_text_matches_blocking_reply() {
    let config = MockLlmConfig {
        stream_chunk_size: 7,
        ..Default::default()
    };
    let provider = MockLlmProvider::new(config).unwrap();
    let request = CompletionRequest::new(vec![Message::user("Tell me a story")], vec![]);

    let blocking = provider.complete(request.clone()).await.unwrap();
    let chunks = provider
        .complete_stream(request, CancellationToken::new())
        .collect_chunks()
        .await
        .unwrap();

    assert_eq!(concat_content(&chunks), blocking.content);
    let terminals: Vec<_> = chunks.iter().filter(|c| c.is_terminal()).collect();
    assert_eq!(terminals.len(), 1);
    assert_eq!(terminals[0].finish_reason, Some(FinishReason::Stop));
    assert!(chunks.last().unwrap().is_terminal());
    assert!(chunks
        .iter()
        .filter_map(|c| c.delta.content.as_deref())
        .all(|piece| piece.chars().count() <= 7));
}

#[tokio::test]
async fn test_stream_tool_call_chunks() {
    let mut stream = provider().complete_stream(
        CompletionRequest::new(
            vec![Message::user("generate random names")],
            builtin_tools(),
        ),
        CancellationToken::new(),
    );

    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item.unwrap());
    }

    assert_eq!(items.len(), 2);
    let call = items[0].delta.tool_call.as_ref().unwrap();
    assert_eq!(call.index, 0);
    assert_eq!(call.name, "random_data");
    let arguments: Value = serde_json::from_str(&call.arguments).unwrap();
    assert_eq!(arguments["data_type"], "name");
    assert_eq!(items[1].finish_reason, Some(FinishReason::ToolCalls));
}

#[tokio::test]
async fn test_cancelled_stream_ends_with_cancellation_error() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = provider()
        .complete_stream(
            CompletionRequest::new(vec![Message::user("Hello there")], vec![]),
            cancel,
        )
        .collect_chunks()
        .await;

    assert_eq!(result.unwrap_err(), LlmError::Cancelled);
}

#[tokio::test]
async fn test_stream_propagates_failed_tool_result_as_single_error() {
    let messages = vec![
        Message::user("run the job"),
        Message::tool("call-1", "job FAILED with exit code 2"),
    ];
    let stream = provider().complete_stream(
        CompletionRequest::new(messages, builtin_tools()),
        CancellationToken::new(),
    );
    let (mut chunks, mut errors) = stream.into_parts();

    assert!(chunks.recv().await.is_none(), "no chunk may be emitted");
    assert_eq!(
        errors.recv().await,
        Some(LlmError::ToolExecutionFailed(
            "job FAILED with exit code 2".to_string()
        ))
    );
    assert_eq!(errors.recv().await, None);
}

#[tokio::test]
async fn test_cancel_after_first_chunk_stops_stream() {
    let config = MockLlmConfig {
        stream_chunk_size: 1,
        ..Default::default()
    };
    let provider = MockLlmProvider::new(config).unwrap();
    let request = CompletionRequest::new(vec![Message::user("tell me everything")], vec![]);
    let full_reply = provider.complete(request.clone()).await.unwrap().content;

    let cancel = CancellationToken::new();
    let mut stream = provider.complete_stream(request, cancel.clone());

    let first = stream.next().await.unwrap().unwrap();
    assert!(first.delta.content.is_some());
    cancel.cancel();

    let mut received = vec![first];
    let mut terminal_error = None;
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => received.push(chunk),
            Err(error) => terminal_error = Some(error),
        }
    }

    assert_eq!(terminal_error, Some(LlmError::Cancelled));
    assert!(received.iter().all(|chunk| !chunk.is_terminal()));
    assert!(concat_content(&received).len() < full_reply.len());
}

#[tokio::test]
async fn test_dropped_consumer_does_not_hang_producer() {
    let config = MockLlmConfig {
        stream_chunk_size: 1,
        ..Default::default()
    };
    let provider = MockLlmProvider::new(config).unwrap();
    let mut stream = provider.complete_stream(
        CompletionRequest::new(vec![Message::user("a long enough message")], vec![]),
        CancellationToken::new(),
    );

    let first = stream.next().await.unwrap().unwrap();
    assert!(first.delta.content.is_some());
    drop(stream);
}

proptest! {
    #[test]
    fn prop_offered_tools_yield_exactly_one_call(
        text in "[a-z ]{1,40}",
        names in proptest::collection::vec("[a-z_]{1,12}", 1..6),
    ) {
        let tools: Vec<ToolDescription> = names.iter().map(|n| tool(n)).collect();
        let decision = decide(&[Message::user(text)], &tools).unwrap();

        match decision {
            Decision::ToolInvocation(calls) => {
                prop_assert_eq!(calls.len(), 1);
                prop_assert!(tools.iter().any(|t| t.name == calls[0].name));
                prop_assert!(serde_json::from_str::<Value>(&calls[0].arguments).is_ok());
            }
            Decision::TextReply(text) => prop_assert!(false, "unexpected text reply {}", text),
        }
    }

    #[test]
    fn prop_text_reply_without_tools(text in "\\PC{0,60}") {
        let decision = decide(&[Message::user(text.clone())], &[]).unwrap();
        match decision {
            Decision::TextReply(reply) => prop_assert!(reply.starts_with("This is a mock response to:")),
            Decision::ToolInvocation(_) => prop_assert!(false, "no tools were offered"),
        }
    }
}
