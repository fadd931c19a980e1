//! Host-side conversation processing
//!
//! Drives the model/tool round trip the way a hosting framework would.

pub mod tool_loop;

pub use tool_loop::{LoopOutcome, ToolLoop};
