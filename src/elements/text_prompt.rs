use std::time::Duration;

use super::fallback::LineIo;
use super::line_editor::{normalize_paste, LineEditor};
use super::{ActiveElement, Step};
use crate::core::input_event::{InputEvent, Key};
use crate::core::text::{visual_len, wrap_to_width};
use crate::error::{Result, TuiError};

pub const DEFAULT_PROMPT: &str = "> ";
const BLOCK_CURSOR: &str = "█";

/// Buffer text with a block cursor inserted at the cursor position.
fn with_block_cursor(editor: &LineEditor) -> String {
    let (before, at, after) = editor.split_at_cursor();
    let mut out = before;
    out.push_str(BLOCK_CURSOR);
    if let Some(ch) = at {
        out.push(ch);
    }
    out.push_str(&after);
    out
}

/// Lays out `body` after `prompt`, one or more rows per logical line.
///
/// Rows after the first start with `continuation`, which is either empty or as wide as
/// `prompt`. With a known `width` long lines wrap.
pub(crate) fn layout(
    prompt: &str,
    continuation: &str,
    body: &str,
    width: Option<usize>,
) -> Vec<String> {
    let mut rows = Vec::new();
    for (idx, logical) in body.split('\n').enumerate() {
        let prefix = if idx == 0 { prompt } else { continuation };
        let Some(width) = width else {
            rows.push(format!("{prefix}{logical}"));
            continue;
        };

        if continuation.is_empty() {
            let line = format!("{prefix}{logical}");
            let wrapped = wrap_to_width(&line, width.max(1));
            if wrapped.is_empty() {
                rows.push(String::new());
            }
            rows.extend(wrapped);
            continue;
        }

        let available = width.saturating_sub(visual_len(prefix)).max(1);
        let wrapped = wrap_to_width(logical, available);
        if wrapped.is_empty() {
            rows.push(prefix.to_owned());
        }
        for (segment_idx, segment) in wrapped.into_iter().enumerate() {
            let lead = if segment_idx == 0 { prefix } else { continuation };
            rows.push(format!("{lead}{segment}"));
        }
    }
    rows
}

/// Single-line free-text input.
pub struct TextPrompt {
    prompt: String,
    editor: LineEditor,
    width: Option<usize>,
}

impl TextPrompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            editor: LineEditor::new(),
            width: None,
        }
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut LineEditor {
        &mut self.editor
    }
}

impl Default for TextPrompt {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

impl ActiveElement for TextPrompt {
    type Output = String;

    fn get_lines(&self) -> Vec<String> {
        let indent = " ".repeat(visual_len(&self.prompt));
        layout(&self.prompt, &indent, &with_block_cursor(&self.editor), self.width)
    }

    fn handle_input(&mut self, event: &InputEvent) -> Step<String> {
        match event.key {
            Key::Enter => return Step::Done(Some(self.editor.take())),
            Key::Escape => {
                self.editor.clear();
                return Step::Done(Some(String::new()));
            }
            Key::ShiftEnter => return Step::Continue,
            Key::Paste => {
                self.editor.insert(&normalize_paste(event.text(), false));
                return Step::Continue;
            }
            _ => {}
        }
        if event.is_ctrl('c') {
            self.editor.clear();
            return Step::Done(Some(String::new()));
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
        match io.read_line(&self.prompt)? {
            Some(line) => Ok(Some(line)),
            None => Err(TuiError::InputClosed),
        }
    }
}

/// Free-text input that can span several lines.
///
/// A trailing backslash before Enter (with the cursor at the end) becomes a newline instead of
/// submitting. ShiftEnter inserts a newline directly. ctrl+d ends with no result.
pub struct MultiLinePrompt {
    prompt: String,
    editor: LineEditor,
    allow_multiline: bool,
    width: Option<usize>,
}

impl MultiLinePrompt {
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

    fn continuation(&self) -> String {
        " ".repeat(visual_len(&self.prompt))
    }
}

impl Default for MultiLinePrompt {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

impl ActiveElement for MultiLinePrompt {
    type Output = String;

    fn get_lines(&self) -> Vec<String> {
        layout(
            &self.prompt,
            &self.continuation(),
            &with_block_cursor(&self.editor),
            self.width,
        )
    }

    fn handle_input(&mut self, event: &InputEvent) -> Step<String> {
        match event.key {
            Key::Enter => {
                if self.allow_multiline
                    && self.editor.at_end()
                    && self.editor.text().ends_with('\\')
                {
                    self.editor.backspace();
                    self.editor.insert("\n");
                    return Step::Continue;
                }
                return Step::Done(Some(self.editor.take()));
            }
            Key::ShiftEnter => {
                if self.allow_multiline {
                    self.editor.insert("\n");
                }
                return Step::Continue;
            }
            Key::Escape => {
                self.editor.clear();
                return Step::Done(Some(String::new()));
            }
            Key::Paste => {
                self.editor
                    .insert(&normalize_paste(event.text(), self.allow_multiline));
                return Step::Continue;
            }
            _ => {}
        }
        if event.is_ctrl('c') {
            self.editor.clear();
            return Step::Done(Some(String::new()));
        }
        if event.is_ctrl('d') {
            self.editor.clear();
            return Step::Done(None);
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
        let continuation = self.continuation();
        let Some(mut text) = io.read_line(&self.prompt)? else {
            return Ok(None);
        };
        while self.allow_multiline && text.ends_with('\\') {
            text.pop();
            text.push('\n');
            match io.read_line(&continuation)? {
                Some(line) => text.push_str(&line),
                None => break,
            }
        }
        Ok(Some(text))
    }
}
