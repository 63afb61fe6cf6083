//! Escape-sequence scanning and SGR style tracking.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    /// `ESC [` params, intermediates, final byte (`A B C D H f J K L M S T s u h l m` ...).
    Csi,
    Osc,
    Dcs,
    Apc,
    Ss3,
    /// `ESC` followed by a single byte that introduces nothing we recognise.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escape<'a> {
    pub text: &'a str,
    pub kind: EscapeKind,
}

impl Escape<'_> {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Select Graphic Rendition, the only family whose effect outlives the line it is on.
    pub fn is_sgr(&self) -> bool {
        self.kind == EscapeKind::Csi && self.text.ends_with('m') && !self.text.starts_with("\x1b[?")
    }
}

/// Returns the escape sequence starting at byte `pos`, if any.
///
/// Unterminated sequences extend to the end of the input so they are never counted as visible
/// text.
pub fn escape_at(input: &str, pos: usize) -> Option<Escape<'_>> {
    let bytes = input.as_bytes();
    if pos >= bytes.len() || bytes[pos] != 0x1b {
        return None;
    }
    if pos + 1 >= bytes.len() {
        return Some(Escape {
            text: &input[pos..],
            kind: EscapeKind::Other,
        });
    }

    let (end, kind) = match bytes[pos + 1] {
        b'[' => (csi_end(bytes, pos), EscapeKind::Csi),
        b']' => (string_end(bytes, pos, true), EscapeKind::Osc),
        b'P' => (string_end(bytes, pos, false), EscapeKind::Dcs),
        b'_' => (string_end(bytes, pos, false), EscapeKind::Apc),
        b'O' => match bytes.get(pos + 2) {
            Some(b) if b.is_ascii() => (pos + 3, EscapeKind::Ss3),
            _ => (pos + 2, EscapeKind::Ss3),
        },
        b if b.is_ascii() => (pos + 2, EscapeKind::Other),
        _ => (pos + 1, EscapeKind::Other),
    };

    Some(Escape {
        text: &input[pos..end],
        kind,
    })
}

fn csi_end(bytes: &[u8], pos: usize) -> usize {
    let mut idx = pos + 2;
    while idx < bytes.len() {
        let b = bytes[idx];
        if (0x40..=0x7e).contains(&b) {
            return idx + 1;
        }
        // Parameter (0x30-0x3f, includes the private `?` prefix) and intermediate bytes.
        if !(0x20..=0x3f).contains(&b) {
            return idx;
        }
        idx += 1;
    }
    bytes.len()
}

fn string_end(bytes: &[u8], pos: usize, bell_terminates: bool) -> usize {
    let mut idx = pos + 2;
    while idx < bytes.len() {
        if bell_terminates && bytes[idx] == 0x07 {
            return idx + 1;
        }
        if bytes[idx] == 0x1b && idx + 1 < bytes.len() && bytes[idx + 1] == b'\\' {
            return idx + 2;
        }
        idx += 1;
    }
    bytes.len()
}

/// Splits styled text into escape sequences and runs of visible text.
pub fn tokens(input: &str) -> Tokens<'_> {
    Tokens { input, pos: 0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Escape(Escape<'a>),
    Text(&'a str),
}

pub struct Tokens<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }
        if let Some(escape) = escape_at(self.input, self.pos) {
            self.pos += escape.len();
            return Some(Token::Escape(escape));
        }
        let start = self.pos;
        let rest = &self.input[start..];
        let end = rest.find('\x1b').map(|idx| start + idx).unwrap_or(self.input.len());
        self.pos = end;
        Some(Token::Text(&self.input[start..end]))
    }
}

/// Removes every recognised escape sequence.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for token in tokens(input) {
        if let Token::Text(text) = token {
            out.push_str(text);
        }
    }
    out
}

/// Accumulated effect of the SGR sequences seen so far.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SgrState {
    bold: bool,
    dim: bool,
    italic: bool,
    underline: bool,
    blink: bool,
    reverse: bool,
    hidden: bool,
    strikethrough: bool,
    fg: Option<String>,
    bg: Option<String>,
}

impl SgrState {
    pub fn apply(&mut self, sgr: &str) {
        let Some(params) = sgr
            .strip_prefix("\x1b[")
            .and_then(|rest| rest.strip_suffix('m'))
        else {
            return;
        };

        if params.is_empty() {
            *self = Self::default();
            return;
        }

        let parts: Vec<&str> = params.split(';').collect();
        let mut idx = 0;
        while idx < parts.len() {
            let code = parts[idx].parse::<u16>().unwrap_or(0);
            if code == 38 || code == 48 {
                let consumed = match parts.get(idx + 1).copied() {
                    Some("5") if idx + 2 < parts.len() => 3,
                    Some("2") if idx + 4 < parts.len() => 5,
                    _ => 0,
                };
                if consumed > 0 {
                    let colour = parts[idx..idx + consumed].join(";");
                    if code == 38 {
                        self.fg = Some(colour);
                    } else {
                        self.bg = Some(colour);
                    }
                    idx += consumed;
                    continue;
                }
            }

            match code {
                0 => *self = Self::default(),
                1 => self.bold = true,
                2 => self.dim = true,
                3 => self.italic = true,
                4 => self.underline = true,
                5 => self.blink = true,
                7 => self.reverse = true,
                8 => self.hidden = true,
                9 => self.strikethrough = true,
                21 => self.bold = false,
                22 => {
                    self.bold = false;
                    self.dim = false;
                }
                23 => self.italic = false,
                24 => self.underline = false,
                25 => self.blink = false,
                27 => self.reverse = false,
                28 => self.hidden = false,
                29 => self.strikethrough = false,
                39 => self.fg = None,
                49 => self.bg = None,
                30..=37 | 90..=97 => self.fg = Some(code.to_string()),
                40..=47 | 100..=107 => self.bg = Some(code.to_string()),
                _ => {}
            }
            idx += 1;
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// A single SGR sequence that recreates this state from a reset terminal.
    pub fn prefix(&self) -> String {
        let flags = [
            (self.bold, "1"),
            (self.dim, "2"),
            (self.italic, "3"),
            (self.underline, "4"),
            (self.blink, "5"),
            (self.reverse, "7"),
            (self.hidden, "8"),
            (self.strikethrough, "9"),
        ];
        let mut codes: Vec<&str> = flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, code)| *code)
            .collect();
        if let Some(fg) = self.fg.as_deref() {
            codes.push(fg);
        }
        if let Some(bg) = self.bg.as_deref() {
            codes.push(bg);
        }

        if codes.is_empty() {
            return String::new();
        }
        format!("\x1b[{}m", codes.join(";"))
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_at, strip_ansi, EscapeKind, SgrState};

    #[test]
    fn csi_terminators_are_recognised() {
        for seq in [
            "\x1b[5A", "\x1b[3B", "\x1b[10C", "\x1b[4D", "\x1b[10;20H", "\x1b[10;20f", "\x1b[2J",
            "\x1b[K", "\x1b[L", "\x1b[M", "\x1b[2S", "\x1b[2T", "\x1b[s", "\x1b[u",
            "\x1b[?2004h", "\x1b[?2004l", "\x1b[1;31m",
        ] {
            let input = format!("{seq}tail");
            let escape = escape_at(&input, 0).expect("escape");
            assert_eq!(escape.text, seq);
            assert_eq!(escape.kind, EscapeKind::Csi);
        }
    }

    #[test]
    fn only_sgr_is_style() {
        assert!(escape_at("\x1b[31m", 0).expect("sgr").is_sgr());
        assert!(!escape_at("\x1b[5A", 0).expect("cursor").is_sgr());
        assert!(!escape_at("\x1b[?2004h", 0).expect("mode").is_sgr());
    }

    #[test]
    fn unterminated_sequence_runs_to_end() {
        let escape = escape_at("\x1b[12", 0).expect("partial");
        assert_eq!(escape.text, "\x1b[12");
    }

    #[test]
    fn ss3_before_multibyte_char_keeps_the_char() {
        assert_eq!(escape_at("\x1bO你好", 0).expect("ss3").text, "\x1bO");
        assert_eq!(strip_ansi("\x1bO你好"), "你好");
        assert_eq!(crate::core::text::visual_len("\x1bO你好"), 4);
        assert_eq!(escape_at("\x1bOA", 0).expect("ss3").text, "\x1bOA");
    }

    #[test]
    fn osc_with_bell_or_st() {
        assert_eq!(
            escape_at("\x1b]8;;http://x\x07link", 0).expect("osc").text,
            "\x1b]8;;http://x\x07"
        );
        assert_eq!(
            escape_at("\x1b]0;title\x1b\\rest", 0).expect("osc").text,
            "\x1b]0;title\x1b\\"
        );
    }

    #[test]
    fn strip_removes_style_and_cursor_codes() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_ansi("\x1b[1m\x1b[32mbold\x1b[0m"), "bold");
        assert_eq!(strip_ansi("text\x1b[5Amore"), "textmore");
        assert_eq!(strip_ansi("\x1b[s\x1b[u"), "");
        assert_eq!(strip_ansi("你好世界"), "你好世界");
    }

    #[test]
    fn sgr_state_tracks_and_resets() {
        let mut state = SgrState::default();
        state.apply("\x1b[1m");
        state.apply("\x1b[38;5;208m");
        assert_eq!(state.prefix(), "\x1b[1;38;5;208m");

        state.apply("\x1b[22m");
        assert_eq!(state.prefix(), "\x1b[38;5;208m");

        state.apply("\x1b[0m");
        assert!(state.is_plain());
        assert_eq!(state.prefix(), "");
    }

    #[test]
    fn truecolor_background_is_kept_whole() {
        let mut state = SgrState::default();
        state.apply("\x1b[48;2;80;0;0m");
        assert_eq!(state.prefix(), "\x1b[48;2;80;0;0m");
    }
}
