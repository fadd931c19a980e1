//! Keyword-driven tool call synthesis
//!
//! Picks which tool the mock model "wants" to call by matching keywords in
//! the triggering text against a fixed priority list. A branch only fires
//! when its target tool is among the tools offered with the request.

use crate::llm::provider::ToolCall;
use crate::tools::ToolDescription;
use serde_json::{json, Value};
use uuid::Uuid;

const ERROR_KEYWORDS: &[&str] = &["error", "fail", "throw"];
const DELAY_KEYWORDS: &[&str] = &["delay", "wait", "sleep", "pause"];
const VALIDATE_KEYWORDS: &[&str] = &["validate", "check"];
const ARTIFACT_KEYWORDS: &[&str] = &["artifact", "create file", "save file"];
const RANDOM_KEYWORDS: &[&str] = &["random", "generate"];

const DEFAULT_DELAY_SECONDS: f64 = 2.0;
const DEFAULT_RANDOM_COUNT: u32 = 5;

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn new_call(name: &str, arguments: Value) -> ToolCall {
    ToolCall {
        id: format!("call-{}", Uuid::new_v4().simple()),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

/// Error subtype inferred from the request text (pure function)
pub fn infer_error_type(lower: &str) -> &'static str {
    if lower.contains("timeout") {
        "timeout"
    } else if contains_any(lower, &["internal", "server"]) {
        "internal"
    } else if contains_any(lower, &["not found", "404"]) {
        "not_found"
    } else {
        "validation"
    }
}

/// Delay length inferred from the request text (pure function)
///
/// Digits are checked as plain substrings in a fixed order, so "15" maps to 5.
pub fn infer_delay_seconds(lower: &str) -> f64 {
    if lower.contains('5') {
        5.0
    } else if lower.contains("10") {
        10.0
    } else if lower.contains('3') {
        3.0
    } else {
        DEFAULT_DELAY_SECONDS
    }
}

/// Validation pattern inferred from the request text (pure function)
pub fn infer_validation_pattern(lower: &str) -> &'static str {
    if contains_any(lower, &["url", "http"]) {
        "url"
    } else if lower.contains("json") {
        "json"
    } else if lower.contains("uuid") {
        "uuid"
    } else if lower.contains("phone") {
        "phone"
    } else {
        "email"
    }
}

/// Canned artifact (file name, content) inferred from the request text
pub fn infer_artifact(lower: &str) -> (&'static str, &'static str) {
    if contains_any(lower, &["text", "txt"]) {
        (
            "sample-data.txt",
            "This is a sample text artifact created by the mock agent.",
        )
    } else if lower.contains("csv") {
        (
            "sample-data.csv",
            "id,name,email\n1,John Doe,john.doe@example.com\n2,Jane Smith,jane.smith@example.com",
        )
    } else {
        (
            "sample-data.json",
            r#"{"id": 1, "name": "John Doe", "email": "john.doe@example.com"}"#,
        )
    }
}

/// Random data kind and count inferred from the request text
pub fn infer_random_request(lower: &str) -> (&'static str, u32) {
    let data_type = if lower.contains("email") {
        "email"
    } else if lower.contains("name") {
        "name"
    } else if lower.contains("number") {
        "number"
    } else if lower.contains("json") {
        "json"
    } else {
        "uuid"
    };

    let count = if lower.contains("10") {
        10
    } else if lower.contains('3') {
        3
    } else if lower.contains('1') {
        1
    } else {
        DEFAULT_RANDOM_COUNT
    };

    (data_type, count)
}

fn artifact_arguments(name: &str, content: &str) -> Value {
    json!({
        "name": name,
        "content": content,
        "type": "url",
        "filename": name,
    })
}

/// Synthesize the single tool call the mock model makes for `text`.
///
/// Returns `None` only when `tools` is empty.
pub fn synthesize_tool_call(tools: &[ToolDescription], text: &str) -> Option<ToolCall> {
    let first = tools.first()?;
    let offered = |name: &str| tools.iter().any(|tool| tool.name == name);
    let lower = text.to_lowercase();

    if contains_any(&lower, ERROR_KEYWORDS) && offered("error") {
        return Some(new_call(
            "error",
            json!({
                "error_type": infer_error_type(&lower),
                "message": text,
            }),
        ));
    }

    if contains_any(&lower, DELAY_KEYWORDS) && offered("delay") {
        return Some(new_call(
            "delay",
            json!({
                "duration_seconds": infer_delay_seconds(&lower),
                "message": text,
            }),
        ));
    }

    if contains_any(&lower, VALIDATE_KEYWORDS) && offered("validate") {
        return Some(new_call(
            "validate",
            json!({
                "pattern": infer_validation_pattern(&lower),
                "input": text,
            }),
        ));
    }

    if contains_any(&lower, ARTIFACT_KEYWORDS) && offered("create_artifact") {
        let (name, content) = infer_artifact(&lower);
        return Some(new_call("create_artifact", artifact_arguments(name, content)));
    }

    if contains_any(&lower, RANDOM_KEYWORDS) && offered("random_data") {
        let (data_type, count) = infer_random_request(&lower);
        return Some(new_call(
            "random_data",
            json!({
                "data_type": data_type,
                "count": count,
            }),
        ));
    }

    if offered("create_artifact") {
        return Some(new_call(
            "create_artifact",
            artifact_arguments(
                "default-file.json",
                r#"{"message": "Default artifact content"}"#,
            ),
        ));
    }

    if offered("echo") {
        return Some(new_call("echo", json!({ "message": text })));
    }

    Some(new_call(&first.name, json!({})))
}
