use unicode_segmentation::UnicodeSegmentation;

use super::ansi::{tokens, SgrState, Token};
use super::width::grapheme_width;

const RESET: &str = "\x1b[0m";

/// Greedy, grapheme-level wrap of `text` into lines of at most `max_width` cells.
///
/// Non-style escapes are emitted once where they occur. A style open at a break is closed at the
/// end of the line and reopened at the start of the next. `\n` forces a break.
pub fn wrap_to_width(text: &str, max_width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let max_width = max_width.max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    let mut style = SgrState::default();

    let mut break_line = |current: &mut String, used: &mut usize, style: &SgrState| {
        if !style.is_plain() {
            current.push_str(RESET);
        }
        lines.push(std::mem::replace(current, style.prefix()));
        *used = 0;
    };

    for token in tokens(text) {
        match token {
            Token::Escape(escape) => {
                if escape.is_sgr() {
                    style.apply(escape.text);
                }
                current.push_str(escape.text);
            }
            Token::Text(run) => {
                for grapheme in run.graphemes(true) {
                    if grapheme == "\n" || grapheme == "\r\n" {
                        break_line(&mut current, &mut used, &style);
                        continue;
                    }
                    let width = grapheme_width(grapheme);
                    if used > 0 && used + width > max_width {
                        break_line(&mut current, &mut used, &style);
                    }
                    current.push_str(grapheme);
                    used += width;
                }
            }
        }
    }

    lines.push(current);
    lines
}
