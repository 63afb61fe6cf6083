//! Grapheme and visible-width measurement.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use super::ansi::{tokens, Token};

/// Tabs never reach the terminal (prompts expand them), so they are measured as their expansion.
pub const TAB_WIDTH: usize = 4;

pub fn grapheme_width(grapheme: &str) -> usize {
    let mut chars = grapheme.chars();
    match (chars.next(), chars.next()) {
        (None, _) => return 0,
        (Some('\t'), None) => return TAB_WIDTH,
        (Some(ch), None) if ch.is_ascii() => {
            return usize::from(!ch.is_ascii_control());
        }
        _ => {}
    }

    if emoji_get(grapheme).is_some() {
        return 2;
    }

    grapheme
        .chars()
        .map(|ch| {
            if ch == '\t' {
                TAB_WIDTH
            } else {
                UnicodeWidthChar::width(ch).unwrap_or(0)
            }
        })
        .sum()
}

/// Terminal cell count of `text` with every escape sequence ignored.
pub fn visual_len(text: &str) -> usize {
    tokens(text)
        .map(|token| match token {
            Token::Text(run) => run.graphemes(true).map(grapheme_width).sum(),
            Token::Escape(_) => 0,
        })
        .sum()
}
