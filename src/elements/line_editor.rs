//! Editing core shared by the free-text elements.

use crate::core::input_event::{InputEvent, Key};

const TAB_SPACES: &str = "    ";

/// Text buffer with a character-indexed cursor and a one-slot kill ring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    chars: Vec<char>,
    cursor: usize,
    killed: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn kill_buffer(&self) -> &str {
        &self.killed
    }

    /// Replaces the text and puts the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.chars.len());
    }

    /// Returns the text and empties the buffer. The kill ring survives.
    pub fn take(&mut self) -> String {
        let text = self.text();
        self.clear();
        text
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.chars.len()
    }

    /// Text before the cursor, the cursor character (if any), and text after it.
    pub fn split_at_cursor(&self) -> (String, Option<char>, String) {
        let before = self.chars[..self.cursor].iter().collect();
        let at = self.chars.get(self.cursor).copied();
        let after = self
            .chars
            .get(self.cursor + 1..)
            .map(|rest| rest.iter().collect())
            .unwrap_or_default();
        (before, at, after)
    }

    pub fn insert(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\t' {
                for space in TAB_SPACES.chars() {
                    self.insert_char(space);
                }
            } else {
                self.insert_char(ch);
            }
        }
    }

    fn insert_char(&mut self, ch: char) {
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) -> Option<char> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.chars.remove(self.cursor))
    }

    pub fn delete_forward(&mut self) -> Option<char> {
        if self.at_end() {
            return None;
        }
        Some(self.chars.remove(self.cursor))
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    /// Start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.line_start();
    }

    /// End of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.chars[self.cursor..]
            .iter()
            .position(|ch| *ch == '\n')
            .map(|offset| self.cursor + offset)
            .unwrap_or(self.chars.len());
    }

    fn line_start(&self) -> usize {
        self.chars[..self.cursor]
            .iter()
            .rposition(|ch| *ch == '\n')
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }

    /// Kills the word before the cursor: trailing whitespace, then non-whitespace.
    pub fn kill_word_backward(&mut self) {
        let mut start = self.cursor;
        while start > 0 && self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        self.kill_range(start, self.cursor);
    }

    pub fn kill_to_end(&mut self) {
        self.kill_range(self.cursor, self.chars.len());
    }

    pub fn kill_to_start(&mut self) {
        self.kill_range(0, self.cursor);
    }

    fn kill_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        self.killed = self.chars.drain(start..end).collect();
        self.cursor = start;
    }

    /// Re-inserts the last killed text at the cursor.
    pub fn yank(&mut self) {
        let killed = self.killed.clone();
        for ch in killed.chars() {
            self.insert_char(ch);
        }
    }

    /// Applies the editing keys every free-text element shares. Returns `false` for events the
    /// element must decide on itself (Enter, Escape, Paste, ctrl+c, ctrl+d, ...).
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match event.key {
            Key::Backspace => {
                self.backspace();
            }
            Key::Delete => {
                self.delete_forward();
            }
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Home => self.move_home(),
            Key::End => self.move_end(),
            Key::Char if event.ctrl => match event.text() {
                "a" => self.move_home(),
                "e" => self.move_end(),
                "b" => self.move_left(),
                "f" => self.move_right(),
                "w" => self.kill_word_backward(),
                "k" => self.kill_to_end(),
                "u" => self.kill_to_start(),
                "y" => self.yank(),
                "l" => self.clear(),
                "j" => {}
                _ => return false,
            },
            Key::Char => self.insert(event.text()),
            _ => return false,
        }
        true
    }
}

/// CRLF and lone CR become LF; tabs become four spaces. Newlines become spaces unless
/// `keep_newlines`.
pub fn normalize_paste(text: &str, keep_newlines: bool) -> String {
    let text = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', TAB_SPACES);
    if keep_newlines {
        text
    } else {
        text.replace('\n', " ")
    }
}
