//! Interactive elements that own the footer content while they run.
//!
//! An element turns key events into a result. It never touches the terminal: the element
//! manager draws whatever [`ActiveElement::get_lines`] returns and feeds it events.

use std::time::Duration;

use crate::core::input_event::InputEvent;
use crate::core::input_source::InputSource;
use crate::error::{Result, TuiError};

pub mod cancellation_menu;
pub mod confirm_prompt;
pub mod fallback;
pub mod footer_input;
pub mod line_editor;
pub mod menu_select;
pub mod text_prompt;

pub use cancellation_menu::CancellationMenu;
pub use confirm_prompt::ConfirmPrompt;
pub use fallback::{LineIo, StdioLines};
pub use footer_input::FooterInput;
pub use line_editor::LineEditor;
pub use menu_select::{MenuSelect, Selection};
pub use text_prompt::{MultiLinePrompt, TextPrompt};

/// Pause before choice elements hand back their result, so the choice is visible.
pub const CHOICE_COMPLETION_DELAY: Duration = Duration::from_millis(150);

/// Outcome of one `handle_input` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    Continue,
    /// Finished; `None` is the element's "no result" signal.
    Done(Option<T>),
}

impl<T> Step<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }
}

pub trait ActiveElement {
    type Output;

    fn get_lines(&self) -> Vec<String>;

    fn handle_input(&mut self, event: &InputEvent) -> Step<Self::Output>;

    fn on_activate(&mut self) {}

    fn on_deactivate(&mut self) {}

    fn completion_delay(&self) -> Duration {
        CHOICE_COMPLETION_DELAY
    }

    /// Self-managed elements drive their own input loop through
    /// [`run_self_managed`](Self::run_self_managed).
    fn is_self_managed(&self) -> bool {
        false
    }

    fn run_self_managed(&mut self, _input: &mut dyn InputSource) -> Result<Option<Self::Output>> {
        Err(TuiError::NotSelfManaged)
    }

    /// Usable columns, set before every `get_lines`.
    fn set_render_width(&mut self, _width: usize) {}

    /// Line-based version of the interaction for non-interactive sessions.
    fn run_fallback(&mut self, io: &mut dyn LineIo) -> Result<Option<Self::Output>>;
}
