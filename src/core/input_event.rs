//! Decoded key events delivered to active elements.

use super::input_buffer::Chunk;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    ShiftEnter,
    Escape,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Paste,
    Char,
}

/// One keypress or one bracketed paste.
///
/// `ch` carries the character for [`Key::Char`] (the letter for control chords) and the whole
/// pasted block for [`Key::Paste`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub ch: Option<String>,
    pub ctrl: bool,
}

impl InputEvent {
    pub fn key(key: Key) -> Self {
        Self {
            key,
            ch: None,
            ctrl: false,
        }
    }

    pub fn char(ch: char) -> Self {
        Self {
            key: Key::Char,
            ch: Some(ch.to_string()),
            ctrl: false,
        }
    }

    pub fn ctrl(letter: char) -> Self {
        Self {
            key: Key::Char,
            ch: Some(letter.to_ascii_lowercase().to_string()),
            ctrl: true,
        }
    }

    pub fn paste(text: impl Into<String>) -> Self {
        Self {
            key: Key::Paste,
            ch: Some(text.into()),
            ctrl: false,
        }
    }

    pub fn text(&self) -> &str {
        self.ch.as_deref().unwrap_or("")
    }

    /// `true` for ctrl + `letter`.
    pub fn is_ctrl(&self, letter: char) -> bool {
        self.ctrl && self.key == Key::Char && self.text() == letter.to_string()
    }

    /// `true` for the unmodified printable character `ch`, ignoring ASCII case.
    pub fn is_char_ignore_case(&self, ch: char) -> bool {
        !self.ctrl
            && self.key == Key::Char
            && self.text().len() == ch.len_utf8()
            && self.text().eq_ignore_ascii_case(&ch.to_string())
    }

    pub fn from_chunk(chunk: Chunk) -> Option<Self> {
        match chunk {
            Chunk::Paste(text) => Some(Self::paste(text)),
            Chunk::Key(seq) => decode(&seq),
        }
    }
}

/// Decodes one complete key sequence. Unrecognised sequences yield `None`.
pub fn decode(seq: &str) -> Option<InputEvent> {
    let event = match seq {
        "\r" => InputEvent::key(Key::Enter),
        "\t" => InputEvent::char('\t'),
        "\x1b" => InputEvent::key(Key::Escape),
        "\x7f" | "\x08" => InputEvent::key(Key::Backspace),
        "\x1b[A" | "\x1bOA" => InputEvent::key(Key::Up),
        "\x1b[B" | "\x1bOB" => InputEvent::key(Key::Down),
        "\x1b[C" | "\x1bOC" => InputEvent::key(Key::Right),
        "\x1b[D" | "\x1bOD" => InputEvent::key(Key::Left),
        "\x1b[H" | "\x1bOH" | "\x1b[1~" | "\x1b[7~" => InputEvent::key(Key::Home),
        "\x1b[F" | "\x1bOF" | "\x1b[4~" | "\x1b[8~" => InputEvent::key(Key::End),
        "\x1b[3~" => InputEvent::key(Key::Delete),
        "\x1b[13;2u" | "\x1b[27;2;13~" | "\x1b\r" | "\x1b\n" => InputEvent::key(Key::ShiftEnter),
        "\x1b[13u" => InputEvent::key(Key::Enter),
        "\x1b[27u" => InputEvent::key(Key::Escape),
        "\x1b[127u" => InputEvent::key(Key::Backspace),
        _ => return decode_char(seq),
    };
    Some(event)
}

fn decode_char(seq: &str) -> Option<InputEvent> {
    let mut chars = seq.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    match ch {
        // Ctrl+A ..= Ctrl+Z (Ctrl+H, Ctrl+I and Ctrl+M are consumed above).
        '\x01'..='\x1a' => {
            let letter = char::from(b'a' + (ch as u8 - 1));
            Some(InputEvent::ctrl(letter))
        }
        c if c.is_control() => None,
        c => Some(InputEvent::char(c)),
    }
}
