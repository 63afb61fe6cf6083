//! Interactive terminal runtime for chat-style command-line tools.
//!
//! Invariant: one element at a time owns input and the footer content. Everything drawn at the
//! bottom of the screen goes through [`TerminalRegion`] using relative cursor motion only.
//!
//! # Public API Overview
//! - Measure, truncate and wrap styled text with [`visual_len`], [`truncate_to_width`] and
//!   [`wrap_to_width`].
//! - Read keys in raw mode with [`RawInputReader`]; draw through [`TerminalFooter`].
//! - Run prompts and menus with [`ElementManager::run`].
//! - Keep scrollback in a [`MessageList`] built from [`messages::factory`].
//! - Wrap model requests and tool calls in a [`CancellationToken`].

pub mod config;
pub mod error;
pub mod logging;

pub mod cancel;
pub mod core;
pub mod elements;
pub mod messages;
pub mod platform;
pub mod runtime;

pub use crate::config::EnvConfig;
pub use crate::error::{Result, TuiError};
pub use crate::logging::init_tracing;

/// ANSI-aware text helpers.
pub use crate::core::text::{strip_ansi, truncate_to_width, visual_len, wrap_to_width};
/// Styles and escape sequences.
pub use crate::core::style::{Color, Style};
/// Input events and the seams the runtime reads and writes through.
pub use crate::core::input_event::{InputEvent, Key};
pub use crate::core::input_source::InputSource;
pub use crate::core::terminal::Terminal;

/// Unix terminal implementations.
pub use crate::platform::{RawInputReader, StdoutTerminal};

/// Footer, region and element orchestration.
pub use crate::runtime::{
    ElementManager, FooterSession, FooterState, Region, StatusBar, StatusTicker, TerminalFooter,
    TerminalRegion,
};

/// Interactive elements.
pub use crate::elements::{
    ActiveElement, CancellationMenu, ConfirmPrompt, FooterInput, LineIo, MenuSelect,
    MultiLinePrompt, Selection, StdioLines, Step, TextPrompt,
};

/// Scrollback messages.
pub use crate::messages::{MessageList, MessageStatus, RenderContent, RenderItem, UIMessage};

/// Cancellation.
pub use crate::cancel::{
    CancellationChoice, CancellationToken, EscapeMonitor, SignalTrigger, ToolExecutionBatch,
    ToolExecutionStatus, TrackedToolCall,
};
