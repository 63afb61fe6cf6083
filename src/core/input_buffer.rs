//! Splits raw stdin bytes into complete key sequences and bracketed pastes.
//!
//! A lone `ESC` is ambiguous: it is either the Escape key or the first byte of a cursor/function
//! key sequence whose remaining bytes have not arrived yet. Incomplete sequences are held until
//! the escape timeout passes, then released verbatim.

use std::time::{Duration, Instant};

const ESC: u8 = 0x1b;
const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// One key: a single character or one complete escape sequence.
    Key(String),
    /// Everything between the bracketed-paste markers.
    Paste(String),
}

#[derive(Debug)]
pub struct InputBuffer {
    pending: String,
    utf8_tail: Vec<u8>,
    paste: Option<String>,
    deadline: Option<Instant>,
    escape_timeout: Duration,
}

impl InputBuffer {
    pub fn new(escape_timeout: Duration) -> Self {
        Self {
            pending: String::new(),
            utf8_tail: Vec::new(),
            paste: None,
            deadline: None,
            escape_timeout,
        }
    }

    pub fn push(&mut self, bytes: &[u8], now: Instant) -> Vec<Chunk> {
        self.deadline = None;
        let text = self.decode_utf8(bytes);
        let mut chunks = Vec::new();
        self.consume(&text, &mut chunks);
        if !self.pending.is_empty() {
            self.deadline = Some(now + self.escape_timeout);
        }
        chunks
    }

    /// Releases held bytes once the escape timeout has passed.
    pub fn expire(&mut self, now: Instant) -> Vec<Chunk> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.release_pending(),
            _ => Vec::new(),
        }
    }

    /// Releases held bytes immediately.
    pub fn release_pending(&mut self) -> Vec<Chunk> {
        self.deadline = None;
        if self.pending.is_empty() {
            return Vec::new();
        }
        vec![Chunk::Key(std::mem::take(&mut self.pending))]
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn in_paste(&self) -> bool {
        self.paste.is_some()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.utf8_tail.clear();
        self.paste = None;
        self.deadline = None;
    }

    fn decode_utf8(&mut self, bytes: &[u8]) -> String {
        let mut data = std::mem::take(&mut self.utf8_tail);
        data.extend_from_slice(bytes);
        match std::str::from_utf8(&data) {
            Ok(text) => text.to_owned(),
            Err(err) if err.error_len().is_none() => {
                // Multi-byte character split across reads.
                let valid = err.valid_up_to();
                self.utf8_tail = data[valid..].to_vec();
                String::from_utf8_lossy(&data[..valid]).into_owned()
            }
            Err(_) => String::from_utf8_lossy(&data).into_owned(),
        }
    }

    fn consume(&mut self, text: &str, chunks: &mut Vec<Chunk>) {
        if let Some(mut paste) = self.paste.take() {
            paste.push_str(text);
            match paste.find(PASTE_END) {
                Some(end) => {
                    let rest = paste[end + PASTE_END.len()..].to_owned();
                    paste.truncate(end);
                    chunks.push(Chunk::Paste(paste));
                    if !rest.is_empty() {
                        self.consume(&rest, chunks);
                    }
                }
                None => self.paste = Some(paste),
            }
            return;
        }

        self.pending.push_str(text);
        if let Some(start) = self.pending.find(PASTE_START) {
            let before = self.pending[..start].to_owned();
            let after = self.pending[start + PASTE_START.len()..].to_owned();
            self.pending.clear();
            let (keys, remainder) = split_sequences(&before);
            chunks.extend(keys.into_iter().map(Chunk::Key));
            if !remainder.is_empty() {
                chunks.push(Chunk::Key(remainder));
            }
            self.paste = Some(String::new());
            self.consume(&after, chunks);
            return;
        }

        let pending = std::mem::take(&mut self.pending);
        let (keys, remainder) = split_sequences(&pending);
        chunks.extend(keys.into_iter().map(Chunk::Key));
        self.pending = remainder;
    }
}

/// Splits `input` into complete keys, returning any incomplete escape tail separately.
fn split_sequences(input: &str) -> (Vec<String>, String) {
    let bytes = input.as_bytes();
    let mut keys = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == ESC {
            match sequence_len(&bytes[pos..]) {
                Some(len) => {
                    keys.push(input[pos..pos + len].to_owned());
                    pos += len;
                }
                None => return (keys, input[pos..].to_owned()),
            }
        } else {
            let Some(ch) = input[pos..].chars().next() else {
                break;
            };
            keys.push(ch.to_string());
            pos += ch.len_utf8();
        }
    }

    (keys, String::new())
}

/// Length of the complete escape sequence at the start of `bytes`, or `None` if more bytes are
/// needed.
fn sequence_len(bytes: &[u8]) -> Option<usize> {
    let second = *bytes.get(1)?;
    match second {
        b'[' => {
            // Legacy X10 mouse report: ESC [ M b x y
            if bytes.get(2) == Some(&b'M') {
                if bytes.len() < 6 {
                    return None;
                }
                // Report bytes that ran into a multi-byte character: keep only `ESC [ M`.
                let boundary = bytes.get(6).map_or(true, |b| (b & 0xc0) != 0x80);
                return Some(if boundary { 6 } else { 3 });
            }
            bytes
                .iter()
                .enumerate()
                .skip(2)
                .find(|(_, b)| (0x40..=0x7e).contains(*b))
                .map(|(idx, _)| idx + 1)
        }
        b'O' => {
            let final_byte = *bytes.get(2)?;
            Some(if final_byte.is_ascii() { 3 } else { 2 })
        }
        b']' => string_terminator(bytes, true),
        b'P' | b'_' => string_terminator(bytes, false),
        // A second ESC or a multi-byte character: the first ESC stands alone.
        ESC => Some(1),
        b if !b.is_ascii() => Some(1),
        _ => Some(2),
    }
}

fn string_terminator(bytes: &[u8], bell: bool) -> Option<usize> {
    let mut idx = 2;
    while idx < bytes.len() {
        if bell && bytes[idx] == 0x07 {
            return Some(idx + 1);
        }
        if bytes[idx] == ESC && bytes.get(idx + 1) == Some(&b'\\') {
            return Some(idx + 2);
        }
        idx += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{Chunk, InputBuffer};
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    fn key(text: &str) -> Chunk {
        Chunk::Key(text.to_owned())
    }

    fn buffer() -> InputBuffer {
        InputBuffer::new(Duration::from_millis(10))
    }

    #[test]
    fn plain_characters_are_split() {
        let mut buf = buffer();
        let chunks = buf.push("ab你".as_bytes(), Instant::now());
        assert_eq!(chunks, vec![key("a"), key("b"), key("你")]);
        assert!(buf.deadline().is_none());
    }

    #[test]
    fn arrow_split_across_reads_is_joined() {
        let mut buf = buffer();
        let now = Instant::now();
        assert!(buf.push(b"\x1b", now).is_empty());
        assert!(buf.push(b"[", now).is_empty());
        assert_eq!(buf.push(b"A", now), vec![key("\x1b[A")]);
    }

    #[test]
    fn lone_escape_is_released_after_timeout() {
        let mut buf = buffer();
        let now = Instant::now();
        assert!(buf.push(b"\x1b", now).is_empty());
        assert!(buf.expire(now + Duration::from_millis(5)).is_empty());
        assert_eq!(buf.expire(now + Duration::from_millis(10)), vec![key("\x1b")]);
        assert!(buf.expire(now + Duration::from_millis(50)).is_empty());
    }

    #[test]
    fn release_pending_skips_the_timeout() {
        let mut buf = buffer();
        assert!(buf.push(b"\x1b", Instant::now()).is_empty());
        assert_eq!(buf.release_pending(), vec![key("\x1b")]);
        assert!(buf.deadline().is_none());
    }

    #[test]
    fn ss3_and_alt_enter() {
        let mut buf = buffer();
        let now = Instant::now();
        assert_eq!(buf.push(b"\x1bOH\x1b\r", now), vec![key("\x1bOH"), key("\x1b\r")]);
    }

    #[test]
    fn ss3_prefix_before_multibyte_char_is_split() {
        let mut buf = buffer();
        let now = Instant::now();
        assert_eq!(
            buf.push("\x1bO你".as_bytes(), now),
            vec![key("\x1bO"), key("你")]
        );
    }

    #[test]
    fn mouse_report_cut_by_multibyte_char() {
        let mut buf = buffer();
        let now = Instant::now();
        assert_eq!(
            buf.push("\x1b[M 你".as_bytes(), now),
            vec![key("\x1b[M"), key(" "), key("你")]
        );
        assert_eq!(buf.push(b"\x1b[M !!", now), vec![key("\x1b[M !!")]);
    }

    #[test]
    fn bracketed_paste_becomes_one_chunk() {
        let mut buf = buffer();
        let now = Instant::now();
        let chunks = buf.push(b"x\x1b[200~line1\nline2\x1b[201~y", now);
        assert_eq!(
            chunks,
            vec![key("x"), Chunk::Paste("line1\nline2".to_owned()), key("y")]
        );
    }

    #[test]
    fn paste_split_across_reads() {
        let mut buf = buffer();
        let now = Instant::now();
        assert!(buf.push(b"\x1b[200~hel", now).is_empty());
        assert!(buf.in_paste());
        assert!(buf.push(b"lo\x1b[20", now).is_empty());
        assert_eq!(buf.push(b"1~", now), vec![Chunk::Paste("hello".to_owned())]);
        assert!(!buf.in_paste());
    }

    #[test]
    fn utf8_split_across_reads() {
        let mut buf = buffer();
        let now = Instant::now();
        let bytes = "你".as_bytes();
        assert!(buf.push(&bytes[..1], now).is_empty());
        assert_eq!(buf.push(&bytes[1..], now), vec![key("你")]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut buf = buffer();
        let now = Instant::now();
        buf.push(b"\x1b[", now);
        buf.clear();
        assert_eq!(buf.pending(), "");
        assert!(buf.deadline().is_none());
        assert!(buf.expire(now + Duration::from_secs(1)).is_empty());
    }
}
