//! Scrollback made of [`UIMessage`]s. Rendering replays every buffer in order, so a redraw always
//! reproduces the same output.

use crate::core::ansi::CLEAR_SCREEN;
use crate::core::input_event::InputEvent;
use crate::core::terminal::Terminal;
use crate::error::{Result, TuiError};

use super::message::{MessageStatus, UIMessage};

#[derive(Debug, Default)]
pub struct MessageList {
    messages: Vec<UIMessage>,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freezes the current last message and appends `msg` as the active one.
    pub fn add(&mut self, mut msg: UIMessage) -> &mut UIMessage {
        if let Some(last) = self.messages.last_mut() {
            last.freeze();
        }
        msg.set_status(MessageStatus::Active);
        tracing::trace!(id = %msg.id, kind = %msg.message_type, "message added");
        self.messages.push(msg);
        let last = self.messages.len() - 1;
        &mut self.messages[last]
    }

    pub fn get_active(&self) -> Option<&UIMessage> {
        self.messages.last()
    }

    pub fn get_active_mut(&mut self) -> Option<&mut UIMessage> {
        self.messages.last_mut()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&UIMessage> {
        self.messages.iter().find(|msg| msg.id == id)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UIMessage> {
        self.messages.iter()
    }

    /// Routes `event` to the active message's input handler. Returns whether it was consumed.
    pub fn dispatch_input(&mut self, event: &InputEvent) -> bool {
        let Some(active) = self.messages.last_mut() else {
            return false;
        };
        if active.is_frozen() {
            return false;
        }
        active
            .input_handler_mut()
            .map(|handler| handler.handle_key(event))
            .unwrap_or(false)
    }

    /// Raw-mode text for one message: every item starts at column 0 and ends with `\r\n`.
    pub fn render_message(msg: &UIMessage) -> String {
        let mut out = String::new();
        for item in msg.output_buffer() {
            out.push('\r');
            out.push_str(&item.render().replace("\r\n", "\n").replace('\n', "\r\n"));
            out.push_str("\r\n");
        }
        out
    }

    pub fn render_to_string(&self) -> String {
        self.messages.iter().map(Self::render_message).collect()
    }

    pub fn render_all<T: Terminal + ?Sized>(&self, terminal: &mut T) -> Result<()> {
        terminal
            .write(&self.render_to_string())
            .map_err(|source| TuiError::io("rendering messages", source))
    }

    /// Clears the screen, then renders every message.
    pub fn full_redraw<T: Terminal + ?Sized>(&self, terminal: &mut T) -> Result<()> {
        let mut frame = String::from(CLEAR_SCREEN);
        frame.push_str(&self.render_to_string());
        terminal
            .write(&frame)
            .map_err(|source| TuiError::io("redrawing messages", source))
    }
}

impl<'a> IntoIterator for &'a MessageList {
    type Item = &'a UIMessage;
    type IntoIter = std::slice::Iter<'a, UIMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::MessageList;
    use crate::core::input_event::InputEvent;
    use crate::core::style::Style;
    use crate::messages::message::{MessageInputHandler, MessageStatus, UIMessage};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn text(kind: &str, body: &str) -> UIMessage {
        let mut msg = UIMessage::new(kind);
        msg.append(body, Style::default()).expect("append");
        msg
    }

    #[test]
    fn add_freezes_previous() {
        let mut list = MessageList::new();
        let a = list.add(text("user", "a")).id.clone();
        let b = list.add(text("assistant", "b")).id.clone();

        assert_eq!(list.get_by_id(&a).map(|m| m.status()), Some(MessageStatus::Complete));
        assert_eq!(list.get_by_id(&b).map(|m| m.status()), Some(MessageStatus::Active));
        assert_eq!(list.get_active().map(|m| m.id.as_str()), Some(b.as_str()));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn frozen_message_cannot_be_revived() {
        let mut list = MessageList::new();
        let first = list.add(text("assistant", "first")).id.clone();
        list.add(text("user", "second"));

        let stale = list.iter().next().expect("first message");
        assert_eq!(stale.id, first);
        assert!(stale.is_frozen());
        assert_eq!(stale.output_buffer().len(), 1);

        let active = list.get_active_mut().expect("active");
        active.append("more", Style::default()).expect("active accepts text");
        assert_eq!(active.status(), MessageStatus::Active);
        assert_eq!(list.render_to_string(), "\rfirst\r\n\rsecond\r\n\rmore\r\n");
    }

    #[test]
    fn added_message_becomes_active_whatever_its_status() {
        let mut list = MessageList::new();
        let done = text("tool", "done").with_status(MessageStatus::Complete);
        let added = list.add(done);
        assert_eq!(added.status(), MessageStatus::Active);
        added.append("streamed", Style::default()).expect("append");
        assert_eq!(list.get_active().map(|m| m.output_buffer().len()), Some(2));
    }

    #[test]
    fn render_is_deterministic() {
        let mut list = MessageList::new();
        list.add(text("user", "hi\nthere"));
        list.add(text("assistant", "ok"));

        let first = list.render_to_string();
        assert_eq!(first, "\rhi\r\nthere\r\n\rok\r\n");
        assert_eq!(list.render_to_string(), first);
    }

    struct Counter(Arc<AtomicUsize>);

    impl MessageInputHandler for Counter {
        fn handle_key(&mut self, _event: &InputEvent) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn prompt_text(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn input_reaches_only_the_active_message() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut list = MessageList::new();
        assert!(!list.dispatch_input(&InputEvent::char('x')));

        let mut first = UIMessage::new("input");
        first
            .set_input_handler(Box::new(Counter(Arc::clone(&hits))))
            .expect("handler");
        list.add(first);
        assert!(list.dispatch_input(&InputEvent::char('x')));

        list.add(text("assistant", "reply"));
        assert!(!list.dispatch_input(&InputEvent::char('y')));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_empties_list() {
        let mut list = MessageList::new();
        list.add(text("user", "a"));
        list.clear();
        assert!(list.is_empty());
        assert!(list.get_active().is_none());
    }
}
