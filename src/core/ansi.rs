//! Output escape sequences written by the runtime.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const REVERSE: &str = "\x1b[7m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";
pub const WHITE: &str = "\x1b[37m";

pub const CLEAR_LINE: &str = "\x1b[2K";
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub const BRACKETED_PASTE_ON: &str = "\x1b[?2004h";
pub const BRACKETED_PASTE_OFF: &str = "\x1b[?2004l";

/// Never written by the runtime; tests assert their absence.
pub const SAVE_CURSOR: &str = "\x1b[s";
pub const RESTORE_CURSOR: &str = "\x1b[u";

/// Cursor up `n` rows. Empty for `n == 0` because `CSI 0 A` still moves one row on most terminals.
pub fn cursor_up(n: usize) -> String {
    if n == 0 {
        String::new()
    } else {
        format!("\x1b[{n}A")
    }
}

pub fn cursor_down(n: usize) -> String {
    if n == 0 {
        String::new()
    } else {
        format!("\x1b[{n}B")
    }
}

#[cfg(test)]
mod tests {
    use super::{cursor_down, cursor_up};

    #[test]
    fn zero_motion_is_empty() {
        assert_eq!(cursor_up(0), "");
        assert_eq!(cursor_down(0), "");
        assert_eq!(cursor_up(3), "\x1b[3A");
        assert_eq!(cursor_down(2), "\x1b[2B");
    }
}
