//! Validate tool implementation
//!
//! Checks input against common patterns. A malformed input is a normal
//! result (`valid: false`), never a tool failure.

use crate::tools::builtin::args::{optional_str, required_str};
use crate::tools::{Tool, ToolContext, ToolDescription, ToolError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\t\n\f\r \-+()]{10,}$").expect("valid phone regex"));

/// Supported validation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    Email,
    Url,
    Json,
    Uuid,
    Phone,
}

impl ValidationKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(Self::Email),
            "url" => Some(Self::Url),
            "json" => Some(Self::Json),
            "uuid" => Some(Self::Uuid),
            "phone" => Some(Self::Phone),
            _ => None,
        }
    }

    /// Apply the rule; `Err` carries the human-readable reason (pure function)
    pub fn check(self, input: &str) -> Result<(), String> {
        match self {
            Self::Email => EMAIL_RE
                .is_match(input)
                .then_some(())
                .ok_or_else(|| "Invalid email format".to_string()),
            Self::Url => check_url(input).map_err(|e| format!("Invalid URL format: {e}")),
            Self::Json => serde_json::from_str::<Value>(input)
                .map(|_| ())
                .map_err(|e| format!("Invalid JSON: {e}")),
            Self::Uuid => Uuid::parse_str(input)
                .map(|_| ())
                .map_err(|_| "Invalid UUID format".to_string()),
            Self::Phone => PHONE_RE
                .is_match(input)
                .then_some(())
                .ok_or_else(|| "Invalid phone number format".to_string()),
        }
    }
}

/// Accept an absolute URL, or an absolute path as found in a request line
fn check_url(input: &str) -> Result<(), url::ParseError> {
    if input.starts_with('/') {
        Url::parse("http://localhost")?.join(input)?;
        return Ok(());
    }
    Url::parse(input).map(|_| ())
}

/// Validate tool - builtin implementation
#[derive(Debug, Default)]
pub struct ValidateTool;

impl ValidateTool {
    pub fn new() -> Self {
        Self
    }

    /// `validation_type`, falling back to its `pattern` alias
    fn validation_type(parameters: &Value) -> Result<&str, ToolError> {
        match optional_str(parameters, "validation_type")? {
            Some(kind) => Ok(kind),
            None => required_str(parameters, "pattern").map_err(|_| {
                ToolError::InvalidArgument(
                    "validation_type parameter is required and must be a string".to_string(),
                )
            }),
        }
    }

    /// Format validation response (pure function)
    fn format_response(validation_type: &str, input: &str, outcome: Result<(), String>) -> Value {
        let (valid, error) = match outcome {
            Ok(()) => (true, String::new()),
            Err(reason) => (false, reason),
        };
        json!({
            "status": "success",
            "valid": valid,
            "validation_type": validation_type,
            "input": input,
            "error": error
        })
    }
}

#[async_trait]
impl Tool for ValidateTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "validate".to_string(),
            description: "Validate input against common patterns".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "Value to validate"
                    },
                    "validation_type": {
                        "type": "string",
                        "description": "One of: email, url, json, uuid, phone"
                    },
                    "pattern": {
                        "type": "string",
                        "description": "Alias of validation_type"
                    }
                },
                "required": ["input"]
            }),
        }
    }

    async fn execute(&self, parameters: &Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let input = required_str(parameters, "input")?;
        let validation_type = Self::validation_type(parameters)?;

        let kind = ValidationKind::parse(validation_type).ok_or_else(|| {
            ToolError::InvalidArgument(
                "unknown validation_type: must be one of (email, url, json, uuid, phone)"
                    .to_string(),
            )
        })?;

        Ok(Self::format_response(
            validation_type,
            input,
            kind.check(input),
        ))
    }
}
