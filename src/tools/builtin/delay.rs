//! Delay tool implementation
//!
//! Simulates slow responses. The wait races the caller's cancellation token
//! and aborts with a cancellation error as soon as the token fires.

use crate::tools::builtin::args::{optional_f64, optional_str};
use crate::tools::{Tool, ToolContext, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_DURATION_SECONDS: f64 = 2.0;
const DEFAULT_MESSAGE: &str = "Delay completed";

/// Delay tool - builtin implementation
///
/// Unbounded unless the tool config sets `max_duration_seconds`.
#[derive(Debug, Default)]
pub struct DelayTool {
    max_duration_seconds: Option<f64>,
}

impl DelayTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the requested duration and turn it into a `Duration` (pure function)
    fn check_duration(seconds: f64, max_seconds: Option<f64>) -> Result<Duration, ToolError> {
        if let Some(max_seconds) = max_seconds.filter(|max| seconds > *max) {
            return Err(ToolError::InvalidArgument(format!(
                "duration_seconds must not exceed {max_seconds}"
            )));
        }
        Duration::try_from_secs_f64(seconds).map_err(|_| {
            ToolError::InvalidArgument(
                "duration_seconds must be a finite, non-negative number".to_string(),
            )
        })
    }

    /// Round to two decimals, as reported in the result
    fn round_seconds(seconds: f64) -> f64 {
        (seconds * 100.0).round() / 100.0
    }

    /// Format delay response (pure function)
    fn format_response(message: &str, requested: f64, elapsed: Duration) -> Value {
        json!({
            "status": "success",
            "message": message,
            "requested_delay_seconds": Self::round_seconds(requested),
            "actual_delay_seconds": Self::round_seconds(elapsed.as_secs_f64())
        })
    }
}

#[async_trait]
impl Tool for DelayTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "delay".to_string(),
            description: "Simulate slow responses with configurable delays".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "duration_seconds": {
                        "type": "number",
                        "minimum": 0,
                        "description": "How long to wait, in seconds",
                        "default": DEFAULT_DURATION_SECONDS
                    },
                    "message": {
                        "type": "string",
                        "description": "Message reported once the delay completes",
                        "default": DEFAULT_MESSAGE
                    }
                }
            }),
        }
    }

    async fn initialize(&mut self, config: Option<&Value>) -> Result<(), ToolError> {
        if let Some(config) = config {
            if let Some(max) = config.get("max_duration_seconds").and_then(|v| v.as_f64()) {
                if !max.is_finite() || max < 0.0 {
                    return Err(ToolError::InitializationError(format!(
                        "max_duration_seconds must be a non-negative number, got {max}"
                    )));
                }
                self.max_duration_seconds = Some(max);
            }
        }
        Ok(())
    }

    async fn execute(&self, parameters: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let requested =
            optional_f64(parameters, "duration_seconds")?.unwrap_or(DEFAULT_DURATION_SECONDS);
        let message = optional_str(parameters, "message")?.unwrap_or(DEFAULT_MESSAGE);
        let duration = Self::check_duration(requested, self.max_duration_seconds)?;

        let started = Instant::now();
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = ctx.cancel.cancelled() => {
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Delay cancelled");
                return Err(ToolError::Cancelled(
                    "delay canceled: context canceled".to_string(),
                ));
            }
        }

        Ok(Self::format_response(message, requested, started.elapsed()))
    }
}
