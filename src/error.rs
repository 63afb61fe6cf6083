use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("no interactive terminal is available")]
    TerminalUnavailable,

    #[error("I/O error while {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("another element is already active")]
    ElementAlreadyActive,

    #[error("element does not drive its own input loop")]
    NotSelfManaged,

    #[error("input stream closed")]
    InputClosed,

    #[error("operation cancelled by user")]
    Cancelled,

    #[error("message '{id}' is frozen and cannot be modified")]
    MessageFrozen { id: String },

    #[error("invalid tracing filter `{filter}`: {message}")]
    InvalidLogFilter { filter: String, message: String },

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl TuiError {
    pub(crate) fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, TuiError>;
