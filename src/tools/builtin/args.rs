//! Argument extraction shared by the builtin tools (pure functions)

use crate::tools::ToolError;
use serde_json::Value;

/// Required string argument
pub fn required_str<'a>(parameters: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    parameters.get(name).and_then(Value::as_str).ok_or_else(|| {
        ToolError::InvalidArgument(format!(
            "{name} parameter is required and must be a string"
        ))
    })
}

/// Optional string argument; present but mistyped is an error
pub fn optional_str<'a>(parameters: &'a Value, name: &str) -> Result<Option<&'a str>, ToolError> {
    match parameters.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ToolError::InvalidArgument(format!("{name} parameter must be a string"))),
    }
}

/// Optional numeric argument; present but mistyped is an error
pub fn optional_f64(parameters: &Value, name: &str) -> Result<Option<f64>, ToolError> {
    match parameters.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| ToolError::InvalidArgument(format!("{name} parameter must be a number"))),
    }
}

/// Optional integer argument; fractional numbers are truncated
pub fn optional_i64(parameters: &Value, name: &str) -> Result<Option<i64>, ToolError> {
    match parameters.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_f64().map(|n| n.trunc() as i64))
            .map(Some)
            .ok_or_else(|| {
                ToolError::InvalidArgument(format!("{name} parameter must be an integer"))
            }),
    }
}
