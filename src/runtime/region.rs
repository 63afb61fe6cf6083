//! Fixed-height strip at the bottom of the output, redrawn in place.
//!
//! All motion is relative: the region remembers which of its rows the cursor sits on
//! (`cursor_at_line`) and moves by exactly that many rows before each redraw. Save/restore
//! cursor sequences are never used.

use crate::core::ansi::{cursor_down, cursor_up, CLEAR_LINE};
use crate::core::terminal::Terminal;
use crate::core::text::truncate_to_width;
use crate::error::{Result, TuiError};

pub trait Region: Send {
    /// Reserves `num_lines` blank rows starting at the cursor row.
    fn activate(&mut self, num_lines: usize) -> Result<()>;

    /// Rewrites the region with `lines`; the cursor ends on the last written row.
    fn render(&mut self, lines: &[String]) -> Result<()>;

    /// Grows or shrinks the reservation without clearing the rows that stay.
    fn update_size(&mut self, num_lines: usize) -> Result<()>;

    /// Erases every reserved row and leaves the cursor on the first one.
    fn deactivate(&mut self) -> Result<()>;

    /// Moves the cursor to column 0 of the region's first row without clearing anything.
    fn move_to_region_start(&mut self) -> Result<()>;

    /// Hands the first `consumed` rows over to scrollback after the caller has printed over
    /// them. The cursor must be on the row right after the printed text.
    fn release_rows(&mut self, consumed: usize) -> Result<()>;

    fn write_raw(&mut self, data: &str) -> Result<()>;

    fn num_lines(&self) -> usize;

    fn cursor_at_line(&self) -> usize;

    fn columns(&self) -> usize;
}

pub struct TerminalRegion<T: Terminal> {
    terminal: T,
    cursor_at_line: usize,
    num_lines: usize,
}

impl<T: Terminal> TerminalRegion<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal,
            cursor_at_line: 0,
            num_lines: 0,
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn into_terminal(self) -> T {
        self.terminal
    }

    fn flush(&mut self, frame: &str) -> Result<()> {
        if frame.is_empty() {
            return Ok(());
        }
        self.terminal
            .write(frame)
            .map_err(|source| TuiError::io("writing to terminal", source))
    }

    /// Appends the motion from the current row to `row` and records the new position.
    fn move_to(&mut self, frame: &mut String, row: usize) {
        if row < self.cursor_at_line {
            frame.push_str(&cursor_up(self.cursor_at_line - row));
        } else {
            frame.push_str(&cursor_down(row - self.cursor_at_line));
        }
        self.cursor_at_line = row;
    }

    /// Clears `count` rows starting at the cursor row, using newlines so the terminal scrolls
    /// when the rows do not exist yet. Leaves the cursor on the last cleared row.
    fn clear_rows_scrolling(frame: &mut String, count: usize) {
        for idx in 0..count {
            if idx > 0 {
                frame.push('\n');
            }
            frame.push('\r');
            frame.push_str(CLEAR_LINE);
        }
    }
}

impl<T: Terminal> Region for TerminalRegion<T> {
    fn activate(&mut self, num_lines: usize) -> Result<()> {
        let num_lines = num_lines.max(1);
        let mut frame = String::new();
        Self::clear_rows_scrolling(&mut frame, num_lines);
        frame.push_str(&cursor_up(num_lines - 1));
        self.flush(&frame)?;

        self.cursor_at_line = 0;
        self.num_lines = num_lines;
        tracing::debug!(num_lines, "region activated");
        Ok(())
    }

    fn render(&mut self, lines: &[String]) -> Result<()> {
        let columns = self.columns();
        let blank = [String::new()];
        let lines = if lines.is_empty() { &blank[..] } else { lines };

        let mut frame = String::new();
        self.move_to(&mut frame, 0);
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                frame.push('\n');
            }
            frame.push('\r');
            frame.push_str(CLEAR_LINE);
            frame.push_str(&truncate_to_width(line, columns));
        }

        let last = lines.len() - 1;
        let stale = self.num_lines.saturating_sub(lines.len());
        if stale > 0 {
            for _ in 0..stale {
                frame.push('\n');
                frame.push('\r');
                frame.push_str(CLEAR_LINE);
            }
            frame.push_str(&cursor_up(stale));
        }

        self.flush(&frame)?;
        self.cursor_at_line = last;
        self.num_lines = lines.len();
        Ok(())
    }

    fn update_size(&mut self, num_lines: usize) -> Result<()> {
        let num_lines = num_lines.max(1);
        if num_lines == self.num_lines {
            return Ok(());
        }

        let mut frame = String::new();
        let old = self.num_lines;
        if num_lines > old {
            if old > 0 {
                self.move_to(&mut frame, old - 1);
                for _ in old..num_lines {
                    frame.push_str("\n\r");
                    frame.push_str(CLEAR_LINE);
                }
            } else {
                self.cursor_at_line = 0;
                Self::clear_rows_scrolling(&mut frame, num_lines);
            }
            self.cursor_at_line = num_lines - 1;
        } else {
            self.move_to(&mut frame, num_lines);
            for row in num_lines..old {
                if row > num_lines {
                    frame.push_str(&cursor_down(1));
                }
                frame.push('\r');
                frame.push_str(CLEAR_LINE);
            }
            self.cursor_at_line = old - 1;
        }
        self.move_to(&mut frame, 0);
        frame.push('\r');
        self.flush(&frame)?;

        self.num_lines = num_lines;
        Ok(())
    }

    fn deactivate(&mut self) -> Result<()> {
        if self.num_lines == 0 {
            self.cursor_at_line = 0;
            return Ok(());
        }

        let mut frame = String::new();
        self.move_to(&mut frame, 0);
        for row in 0..self.num_lines {
            if row > 0 {
                frame.push_str(&cursor_down(1));
            }
            frame.push('\r');
            frame.push_str(CLEAR_LINE);
        }
        self.cursor_at_line = self.num_lines - 1;
        self.move_to(&mut frame, 0);
        self.flush(&frame)?;

        tracing::debug!(num_lines = self.num_lines, "region deactivated");
        self.num_lines = 0;
        Ok(())
    }

    fn move_to_region_start(&mut self) -> Result<()> {
        let mut frame = String::new();
        self.move_to(&mut frame, 0);
        frame.push('\r');
        self.flush(&frame)
    }

    fn release_rows(&mut self, consumed: usize) -> Result<()> {
        self.num_lines = self.num_lines.saturating_sub(consumed);
        self.cursor_at_line = 0;
        Ok(())
    }

    fn write_raw(&mut self, data: &str) -> Result<()> {
        self.flush(data)
    }

    fn num_lines(&self) -> usize {
        self.num_lines
    }

    fn cursor_at_line(&self) -> usize {
        self.cursor_at_line
    }

    fn columns(&self) -> usize {
        usize::from(self.terminal.columns().max(1))
    }
}
