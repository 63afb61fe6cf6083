//! Bookkeeping for the tool calls of one assistant response.

use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    Skipped,
}

impl ToolExecutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Pending => "⏳",
            Self::Running => "🔄",
            Self::Completed => "✅",
            Self::Failed => "❌",
            Self::Cancelled => "🚫",
            Self::Skipped => "⏭️",
        }
    }
}

impl fmt::Display for ToolExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to continue after a batch was interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancellationChoice {
    /// Run the cancelled tool again, then the pending ones.
    Retry,
    /// Drop the cancelled tool, run the pending ones.
    Skip,
    /// Keep completed results and stop.
    KeepCompleted,
    /// Roll back to before the assistant response.
    UndoAll,
}

impl CancellationChoice {
    pub const ALL: [CancellationChoice; 4] = [
        CancellationChoice::Retry,
        CancellationChoice::Skip,
        CancellationChoice::KeepCompleted,
        CancellationChoice::UndoAll,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::Skip => "skip",
            Self::KeepCompleted => "keep",
            Self::UndoAll => "undo",
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            Self::Retry => 'r',
            Self::Skip => 's',
            Self::KeepCompleted => 'k',
            Self::UndoAll => 'u',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Retry => "[R] Retry cancelled tool and continue",
            Self::Skip => "[S] Skip cancelled tool, continue with pending",
            Self::KeepCompleted => "[K] Keep completed only, stop here",
            Self::UndoAll => "[U] Undo all (rollback to before response)",
        }
    }

    pub fn from_shortcut(ch: char) -> Option<Self> {
        let ch = ch.to_ascii_lowercase();
        Self::ALL.into_iter().find(|choice| choice.shortcut() == ch)
    }
}

impl fmt::Display for CancellationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
    pub status: ToolExecutionStatus,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl TrackedToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
            status: ToolExecutionStatus::Pending,
            result: None,
            error: None,
        }
    }

    /// Compact JSON of the input, cut to `max_len` characters with a trailing `...`.
    pub fn display_input(&self, max_len: usize) -> String {
        let text = self.input.to_string();
        if text.chars().count() <= max_len {
            return text;
        }
        let keep = max_len.saturating_sub(3);
        let mut out: String = text.chars().take(keep).collect();
        out.push_str("...");
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolExecutionBatch {
    pub tool_calls: Vec<TrackedToolCall>,
    pub cancelled_at_index: Option<usize>,
}

impl ToolExecutionBatch {
    pub fn new(tool_calls: Vec<TrackedToolCall>) -> Self {
        Self {
            tool_calls,
            cancelled_at_index: None,
        }
    }

    fn set_status(&mut self, index: usize, status: ToolExecutionStatus) -> Option<&mut TrackedToolCall> {
        let call = self.tool_calls.get_mut(index)?;
        call.status = status;
        Some(call)
    }

    pub fn mark_running(&mut self, index: usize) {
        self.set_status(index, ToolExecutionStatus::Running);
    }

    pub fn mark_completed(&mut self, index: usize, result: Value) {
        if let Some(call) = self.set_status(index, ToolExecutionStatus::Completed) {
            call.result = Some(result);
        }
    }

    pub fn mark_failed(&mut self, index: usize, error: impl Into<String>) {
        if let Some(call) = self.set_status(index, ToolExecutionStatus::Failed) {
            call.error = Some(error.into());
        }
    }

    pub fn mark_cancelled(&mut self, index: usize) {
        if self.set_status(index, ToolExecutionStatus::Cancelled).is_some() {
            self.cancelled_at_index = Some(index);
        }
    }

    pub fn mark_skipped(&mut self, index: usize) {
        self.set_status(index, ToolExecutionStatus::Skipped);
    }

    fn with_status(&self, status: ToolExecutionStatus) -> Vec<&TrackedToolCall> {
        self.tool_calls
            .iter()
            .filter(|call| call.status == status)
            .collect()
    }

    pub fn completed(&self) -> Vec<&TrackedToolCall> {
        self.with_status(ToolExecutionStatus::Completed)
    }

    pub fn pending(&self) -> Vec<&TrackedToolCall> {
        self.with_status(ToolExecutionStatus::Pending)
    }

    pub fn cancelled_tool(&self) -> Option<&TrackedToolCall> {
        self.cancelled_at_index
            .and_then(|index| self.tool_calls.get(index))
    }

    /// One numbered line per call: `  1. ✅ read({"path":"a"}) - completed`.
    pub fn summary_lines(&self) -> Vec<String> {
        self.tool_calls
            .iter()
            .enumerate()
            .map(|(idx, call)| {
                format!(
                    "  {}. {} {}({}) - {}",
                    idx + 1,
                    call.status.icon(),
                    call.name,
                    call.display_input(30),
                    call.status
                )
            })
            .collect()
    }
}
