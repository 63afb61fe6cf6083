use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::core::input_event::InputEvent;
use crate::core::style::Style;
use crate::error::{Result, TuiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    /// Still streaming.
    Pending,
    /// Last in the list; the only one that receives input.
    Active,
    /// Frozen.
    Complete,
    Error,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::default())
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderContent {
    Text(String),
    Styled(Vec<Span>),
    /// Pre-rendered lines, written as they are.
    Block(Vec<String>),
}

impl RenderContent {
    /// Terminal text for this content; `style` only applies to [`RenderContent::Text`].
    pub fn render(&self, style: &Style) -> String {
        match self {
            RenderContent::Text(text) => style.paint(text),
            RenderContent::Styled(spans) => spans
                .iter()
                .map(|span| span.style.paint(&span.text))
                .collect(),
            RenderContent::Block(lines) => lines.join("\n"),
        }
    }

    pub fn line_count(&self) -> usize {
        let newlines = |text: &str| text.matches('\n').count();
        match self {
            RenderContent::Text(text) => 1 + newlines(text),
            RenderContent::Styled(spans) => {
                1 + spans.iter().map(|span| newlines(&span.text)).sum::<usize>()
            }
            RenderContent::Block(lines) => {
                lines.len().max(1) + lines.iter().map(|line| newlines(line)).sum::<usize>()
            }
        }
    }
}

impl From<&str> for RenderContent {
    fn from(text: &str) -> Self {
        RenderContent::Text(text.to_owned())
    }
}

impl From<String> for RenderContent {
    fn from(text: String) -> Self {
        RenderContent::Text(text)
    }
}

impl From<Vec<Span>> for RenderContent {
    fn from(spans: Vec<Span>) -> Self {
        RenderContent::Styled(spans)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderItem {
    pub content: RenderContent,
    pub style: Style,
    /// Replaced by the next transient item (spinners, progress).
    pub is_transient: bool,
}

impl RenderItem {
    pub fn new(content: impl Into<RenderContent>, style: Style) -> Self {
        Self {
            content: content.into(),
            style,
            is_transient: false,
        }
    }

    pub fn render(&self) -> String {
        self.content.render(&self.style)
    }
}

/// Receives key events while its message is the active one.
pub trait MessageInputHandler: Send {
    /// Returns `true` when the event was consumed.
    fn handle_key(&mut self, event: &InputEvent) -> bool;

    fn prompt_text(&self) -> String;
}

/// One entry of the scrollback. Owns its render buffer; frozen once a newer message arrives.
pub struct UIMessage {
    pub id: String,
    pub message_type: String,
    output_buffer: Vec<RenderItem>,
    status: MessageStatus,
    pub metadata: BTreeMap<String, Value>,
    input_handler: Option<Box<dyn MessageInputHandler>>,
}

impl fmt::Debug for UIMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UIMessage")
            .field("id", &self.id)
            .field("message_type", &self.message_type)
            .field("status", &self.status)
            .field("items", &self.output_buffer.len())
            .field("has_input_handler", &self.input_handler.is_some())
            .finish()
    }
}

fn short_id() -> String {
    let mut id = uuid::Uuid::new_v4().to_string();
    id.truncate(8);
    id
}

impl UIMessage {
    pub fn new(message_type: impl Into<String>) -> Self {
        Self {
            id: short_id(),
            message_type: message_type.into(),
            output_buffer: Vec::new(),
            status: MessageStatus::Pending,
            metadata: BTreeMap::new(),
            input_handler: None,
        }
    }

    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> MessageStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: MessageStatus) {
        self.status = status;
    }

    pub fn output_buffer(&self) -> &[RenderItem] {
        &self.output_buffer
    }

    /// Appends without the frozen check; for messages still being built.
    pub(crate) fn push_item(&mut self, item: RenderItem) {
        self.output_buffer.push(item);
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.is_frozen() {
            return Err(TuiError::MessageFrozen {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    pub fn append(&mut self, content: impl Into<RenderContent>, style: Style) -> Result<()> {
        self.ensure_mutable()?;
        self.output_buffer.push(RenderItem::new(content, style));
        Ok(())
    }

    pub fn append_newline(&mut self) -> Result<()> {
        self.append("", Style::default())
    }

    /// Replaces any previous transient item with this one.
    pub fn set_transient(&mut self, content: impl Into<RenderContent>, style: Style) -> Result<()> {
        self.ensure_mutable()?;
        self.output_buffer.retain(|item| !item.is_transient);
        self.output_buffer.push(RenderItem {
            is_transient: true,
            ..RenderItem::new(content, style)
        });
        Ok(())
    }

    pub fn clear_transient(&mut self) {
        self.output_buffer.retain(|item| !item.is_transient);
    }

    pub fn set_input_handler(&mut self, handler: Box<dyn MessageInputHandler>) -> Result<()> {
        self.ensure_mutable()?;
        self.input_handler = Some(handler);
        Ok(())
    }

    pub fn input_handler_mut(&mut self) -> Option<&mut (dyn MessageInputHandler + 'static)> {
        self.input_handler.as_deref_mut()
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Marks the message complete, dropping its input handler and transient items.
    pub fn freeze(&mut self) {
        self.status = MessageStatus::Complete;
        self.input_handler = None;
        self.clear_transient();
    }

    pub fn is_frozen(&self) -> bool {
        self.status == MessageStatus::Complete
    }

    /// Terminal rows the buffer occupies before wrapping.
    pub fn visual_line_count(&self) -> usize {
        self.output_buffer
            .iter()
            .map(|item| item.content.line_count())
            .sum()
    }
}
