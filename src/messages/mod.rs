//! Message-list scrollback: each message owns its render buffer and only the newest one is
//! mutable.

pub mod factory;
pub mod list;
pub mod message;

pub use factory::TokenUsage;
pub use list::MessageList;
pub use message::{
    MessageInputHandler, MessageStatus, RenderContent, RenderItem, Span, UIMessage,
};
