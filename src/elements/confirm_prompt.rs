use super::fallback::LineIo;
use super::{ActiveElement, Step};
use crate::core::ansi::{BOLD, DIM, GREEN, RESET, YELLOW};
use crate::core::input_event::{InputEvent, Key};
use crate::core::text::truncate_to_width;
use crate::error::Result;

const PREVIEW_RULE_WIDTH: usize = 50;
const PREVIEW_LINE_WIDTH: usize = 48;
pub const DEFAULT_MAX_PREVIEW_LINES: usize = 10;

/// Yes / no / cancel question, optionally below a bounded preview box (e.g. a diff).
///
/// Results: `Some(true)` for `y`, `Some(false)` for `n`, `None` for Escape or ctrl+c.
pub struct ConfirmPrompt {
    message: String,
    preview_lines: Vec<String>,
    max_preview_lines: usize,
    response: String,
}

impl ConfirmPrompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            preview_lines: Vec::new(),
            max_preview_lines: DEFAULT_MAX_PREVIEW_LINES,
            response: String::new(),
        }
    }

    pub fn with_preview(mut self, lines: Vec<String>) -> Self {
        self.preview_lines = lines;
        self
    }

    pub fn max_preview_lines(mut self, max: usize) -> Self {
        self.max_preview_lines = max;
        self
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

impl Default for ConfirmPrompt {
    fn default() -> Self {
        Self::new("Confirm?")
    }
}

impl ActiveElement for ConfirmPrompt {
    type Output = bool;

    fn get_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.preview_lines.is_empty() {
            let rule = "─".repeat(PREVIEW_RULE_WIDTH);
            lines.push(format!("{DIM}┌{rule}{RESET}"));
            for line in self.preview_lines.iter().take(self.max_preview_lines) {
                lines.push(format!(
                    "{DIM}│ {RESET}{}",
                    truncate_to_width(line, PREVIEW_LINE_WIDTH)
                ));
            }
            let hidden = self.preview_lines.len().saturating_sub(self.max_preview_lines);
            if hidden > 0 {
                lines.push(format!("{DIM}│ ... ({hidden} more lines){RESET}"));
            }
            lines.push(format!("{DIM}└{rule}{RESET}"));
        }

        lines.push(format!(
            "{YELLOW}{BOLD}{}{RESET} {DIM}[y/n/esc]:{RESET} {GREEN}{}{RESET}",
            self.message, self.response
        ));
        lines
    }

    fn handle_input(&mut self, event: &InputEvent) -> Step<bool> {
        if event.is_char_ignore_case('y') {
            self.response = "y".to_owned();
            return Step::Done(Some(true));
        }
        if event.is_char_ignore_case('n') {
            self.response = "n".to_owned();
            return Step::Done(Some(false));
        }
        if event.key == Key::Escape || event.is_ctrl('c') {
            self.response = "esc".to_owned();
            return Step::Done(None);
        }
        Step::Continue
    }

    fn run_fallback(&mut self, io: &mut dyn LineIo) -> Result<Option<bool>> {
        for line in &self.preview_lines {
            io.print(&format!("  {line}\n"))?;
        }
        let Some(answer) = io.read_line(&format!("{} [y/n]: ", self.message))? else {
            return Ok(None);
        };
        let answer = answer.trim().to_ascii_lowercase();
        Ok(Some(answer == "y" || answer == "yes"))
    }
}
