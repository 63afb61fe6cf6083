use unicode_segmentation::UnicodeSegmentation;

use super::ansi::{tokens, SgrState, Token};
use super::width::{grapheme_width, visual_len};

pub const ELLIPSIS: &str = "…";
const RESET: &str = "\x1b[0m";

/// Shortens `text` to at most `max_width` cells, ending in an ellipsis when anything was cut.
///
/// Escape sequences before the cut are kept. When a style is still open at the cut, the ellipsis
/// is drawn in that style and followed by a reset so nothing leaks into the next line.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if visual_len(text) <= max_width {
        return text.to_owned();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut out = String::with_capacity(text.len().min(budget * 4 + 16));
    let mut used = 0;
    let mut style = SgrState::default();

    'outer: for token in tokens(text) {
        match token {
            Token::Escape(escape) => {
                if escape.is_sgr() {
                    style.apply(escape.text);
                }
                out.push_str(escape.text);
            }
            Token::Text(run) => {
                for grapheme in run.graphemes(true) {
                    let width = grapheme_width(grapheme);
                    if used + width > budget {
                        break 'outer;
                    }
                    out.push_str(grapheme);
                    used += width;
                }
            }
        }
    }

    out.push_str(ELLIPSIS);
    if !style.is_plain() {
        out.push_str(RESET);
    }
    out
}
