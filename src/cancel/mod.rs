//! Cooperative cancellation for model requests and tool batches.

pub mod batch;
pub mod token;
pub mod triggers;

pub use batch::{CancellationChoice, ToolExecutionBatch, ToolExecutionStatus, TrackedToolCall};
pub use token::CancellationToken;
pub use triggers::{EscapeMonitor, SignalTrigger};
