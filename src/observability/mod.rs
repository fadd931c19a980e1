//! Observability for the mock agent
//!
//! Structured logging via `tracing`, plus span macros for completions and
//! tool executions.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};

// Span macros for structured logging
pub use logging::{completion_span, tool_span};
