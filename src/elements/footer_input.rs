use std::time::Duration;

use super::fallback::LineIo;
use super::line_editor::{normalize_paste, LineEditor};
use super::text_prompt::{layout, DEFAULT_PROMPT};
use super::{ActiveElement, Step};
use crate::core::ansi::{RESET, REVERSE};
use crate::core::input_event::{InputEvent, Key};
use crate::error::Result;

/// Width-aware chat input drawn in the footer.
///
/// Wrapped and continuation rows use the full width (no indent). The cursor is shown in
/// reverse video. Escape and ctrl+d on an empty buffer end with no result.
pub struct FooterInput {
    prompt: String,
    editor: LineEditor,
    allow_multiline: bool,
    width: Option<usize>,
}

impl FooterInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            editor: LineEditor::new(),
            allow_multiline: true,
            width: None,
        }
    }

    pub fn allow_multiline(mut self, allow: bool) -> Self {
        self.allow_multiline = allow;
        self
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut LineEditor {
        &mut self.editor
    }

    fn body(&self) -> String {
        let (mut out, at, after) = self.editor.split_at_cursor();
        match at {
            Some('\n') | None => {
                out.push_str(REVERSE);
                out.push(' ');
                out.push_str(RESET);
                if at.is_some() {
                    out.push('\n');
                }
            }
            Some(ch) => {
                out.push_str(REVERSE);
                out.push(ch);
                out.push_str(RESET);
            }
        }
        out.push_str(&after);
        out
    }
}

impl Default for FooterInput {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

impl ActiveElement for FooterInput {
    type Output = String;

    fn get_lines(&self) -> Vec<String> {
        layout(&self.prompt, "", &self.body(), self.width)
    }

    fn handle_input(&mut self, event: &InputEvent) -> Step<String> {
        match event.key {
            Key::Enter => return Step::Done(Some(self.editor.take())),
            Key::ShiftEnter => {
                if self.allow_multiline {
                    self.editor.insert("\n");
                }
                return Step::Continue;
            }
            Key::Escape => return Step::Done(None),
            Key::Paste => {
                self.editor
                    .insert(&normalize_paste(event.text(), self.allow_multiline));
                return Step::Continue;
            }
            _ => {}
        }
        if event.is_ctrl('c') {
            return Step::Done(None);
        }
        if event.is_ctrl('d') {
            if self.editor.is_empty() {
                return Step::Done(None);
            }
            self.editor.delete_forward();
            return Step::Continue;
        }
        self.editor.apply(event);
        Step::Continue
    }

    fn completion_delay(&self) -> Duration {
        Duration::ZERO
    }

    fn set_render_width(&mut self, width: usize) {
        self.width = Some(width);
    }

    fn run_fallback(&mut self, io: &mut dyn LineIo) -> Result<Option<String>> {
        io.read_line(&self.prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::FooterInput;
    use crate::core::input_event::{InputEvent, Key};
    use crate::core::text::{strip_ansi, visual_len};
    use crate::elements::{ActiveElement, Step};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_shows_reverse_space_cursor() {
        let input = FooterInput::default();
        assert_eq!(input.get_lines(), vec!["> \x1b[7m \x1b[0m".to_string()]);
    }

    #[test]
    fn cursor_in_middle_highlights_character() {
        let mut input = FooterInput::default();
        input.editor_mut().set_text("hello");
        input.editor_mut().set_cursor(1);
        assert_eq!(input.get_lines(), vec!["> h\x1b[7me\x1b[0mllo".to_string()]);
    }

    #[test]
    fn continuation_lines_have_no_indent() {
        let mut input = FooterInput::default();
        input.editor_mut().set_text("line1\nline2\nline3");
        let lines = input.get_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("> "));
        assert_eq!(lines[1], "line2");
        assert_eq!(strip_ansi(&lines[2]), "line3 ");
    }

    #[test]
    fn long_input_wraps_to_full_width() {
        let mut input = FooterInput::default();
        input.set_render_width(10);
        input.editor_mut().set_text("abcdefghijklmnop");
        let lines = input.get_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "> abcdefgh");
        assert!(lines.iter().all(|line| visual_len(line) <= 10));
    }

    #[test]
    fn paste_expands_tabs_and_moves_cursor() {
        let mut input = FooterInput::default();
        input.handle_input(&InputEvent::paste("hello\tworld"));
        assert_eq!(input.editor().text(), "hello    world");
        assert_eq!(input.editor().cursor(), 14);
    }

    #[test]
    fn enter_submits_and_escape_cancels() {
        let mut input = FooterInput::default();
        input.editor_mut().set_text("hello");
        assert_eq!(
            input.handle_input(&InputEvent::key(Key::Enter)),
            Step::Done(Some("hello".to_string()))
        );

        input.editor_mut().set_text("draft");
        assert_eq!(input.handle_input(&InputEvent::key(Key::Escape)), Step::Done(None));
    }

    #[test]
    fn ctrl_d_on_empty_buffer_ends() {
        let mut input = FooterInput::default();
        assert_eq!(input.handle_input(&InputEvent::ctrl('d')), Step::Done(None));

        input.editor_mut().set_text("ab");
        input.editor_mut().set_cursor(0);
        assert_eq!(input.handle_input(&InputEvent::ctrl('d')), Step::Continue);
        assert_eq!(input.editor().text(), "b");
    }

    #[test]
    fn home_and_end() {
        let mut input = FooterInput::default();
        input.editor_mut().set_text("hello");
        input.handle_input(&InputEvent::key(Key::Home));
        assert_eq!(input.editor().cursor(), 0);
        input.handle_input(&InputEvent::key(Key::End));
        assert_eq!(input.editor().cursor(), 5);
    }
}
