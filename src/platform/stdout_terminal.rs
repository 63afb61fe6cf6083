use std::io;

use libc::c_int;

use super::tty::{read_winsize, write_all_fd};
use crate::core::terminal::Terminal;

const DEFAULT_COLUMNS: u16 = 80;
const DEFAULT_ROWS: u16 = 24;

/// Writes frames straight to stdout's file descriptor, bypassing `std::io::Stdout` buffering.
pub struct StdoutTerminal {
    fd: c_int,
}

impl StdoutTerminal {
    pub fn new() -> Self {
        Self {
            fd: libc::STDOUT_FILENO,
        }
    }

    pub fn with_fd(fd: c_int) -> Self {
        Self { fd }
    }
}

impl Default for StdoutTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for StdoutTerminal {
    fn write(&mut self, data: &str) -> io::Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        write_all_fd(self.fd, data.as_bytes())
    }

    fn columns(&self) -> u16 {
        read_winsize(self.fd)
            .map(|(cols, _)| cols)
            .unwrap_or(DEFAULT_COLUMNS)
    }

    fn rows(&self) -> u16 {
        read_winsize(self.fd)
            .map(|(_, rows)| rows)
            .unwrap_or(DEFAULT_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::StdoutTerminal;
    use crate::core::terminal::Terminal;
    use crate::platform::tty::tests::open_pty;
    use crate::platform::tty::{poll_readable, read_fd, RawModeGuard};
    use std::time::Duration;

    #[test]
    fn writes_reach_the_pty() {
        let pty = open_pty();
        let _raw = RawModeGuard::enter(pty.slave).expect("raw");
        let mut terminal = StdoutTerminal::with_fd(pty.slave);
        terminal.write("frame").expect("write");

        assert!(poll_readable(pty.master, Some(Duration::from_millis(500))).expect("poll"));
        let mut buf = [0u8; 16];
        let n = read_fd(pty.master, &mut buf).expect("read");
        assert_eq!(&buf[..n], b"frame");
    }

    #[test]
    fn size_falls_back_when_unknown() {
        let pty = open_pty();
        let terminal = StdoutTerminal::with_fd(pty.slave);
        // A fresh pty reports 0x0, which is treated as unknown.
        assert_eq!(terminal.columns(), 80);
        assert_eq!(terminal.rows(), 24);
    }
}
