//! Raw-mode keyboard reader.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use libc::c_int;

use super::tty::{discard_input, is_tty, poll_readable, read_fd, write_all_fd, RawModeGuard};
use crate::config::EnvConfig;
use crate::core::ansi::{BRACKETED_PASTE_OFF, BRACKETED_PASTE_ON};
use crate::core::input_buffer::InputBuffer;
use crate::core::input_event::InputEvent;
use crate::core::input_source::InputSource;
use crate::error::{Result, TuiError};

const READ_CHUNK: usize = 1024;

/// Reads keys from a terminal file descriptor in raw mode.
///
/// Raw mode and bracketed paste are held between `start` and `stop` (or drop).
pub struct RawInputReader {
    input_fd: c_int,
    output_fd: c_int,
    buffer: InputBuffer,
    queue: VecDeque<InputEvent>,
    raw_mode: Option<RawModeGuard>,
}

impl RawInputReader {
    pub fn new(config: &EnvConfig) -> Self {
        Self::with_fds(
            libc::STDIN_FILENO,
            libc::STDOUT_FILENO,
            Duration::from_millis(config.escape_timeout_ms),
        )
    }

    pub fn with_fds(input_fd: c_int, output_fd: c_int, escape_timeout: Duration) -> Self {
        Self {
            input_fd,
            output_fd,
            buffer: InputBuffer::new(escape_timeout),
            queue: VecDeque::new(),
            raw_mode: None,
        }
    }

    /// Reads whatever arrives within `wait` and queues the decoded events.
    fn pump(&mut self, wait: Option<Duration>) -> Result<()> {
        let now = Instant::now();
        let wait = match (wait, self.buffer.deadline()) {
            (Some(wait), Some(deadline)) => Some(wait.min(deadline.saturating_duration_since(now))),
            (None, Some(deadline)) => Some(deadline.saturating_duration_since(now)),
            (wait, None) => wait,
        };

        let readable = poll_readable(self.input_fd, wait)
            .map_err(|source| TuiError::io("waiting for input", source))?;
        if readable {
            let mut bytes = [0u8; READ_CHUNK];
            let n = read_fd(self.input_fd, &mut bytes)
                .map_err(|source| TuiError::io("reading input", source))?;
            if n == 0 {
                return Err(TuiError::InputClosed);
            }
            let chunks = self.buffer.push(&bytes[..n], Instant::now());
            self.queue
                .extend(chunks.into_iter().filter_map(InputEvent::from_chunk));
        }

        let expired = self.buffer.expire(Instant::now());
        self.queue
            .extend(expired.into_iter().filter_map(InputEvent::from_chunk));
        Ok(())
    }

    fn ensure_active(&self) -> Result<()> {
        if self.raw_mode.is_none() {
            return Err(TuiError::TerminalUnavailable);
        }
        Ok(())
    }
}

impl InputSource for RawInputReader {
    fn start(&mut self) -> Result<()> {
        if self.raw_mode.is_some() {
            return Ok(());
        }
        if !is_tty(self.input_fd) {
            tracing::debug!(fd = self.input_fd, "input is not a terminal");
            return Err(TuiError::TerminalUnavailable);
        }

        let guard = match RawModeGuard::enter(self.input_fd) {
            Ok(guard) => guard,
            Err(err) => {
                tracing::warn!(error = %err, "could not enter raw mode");
                return Err(TuiError::TerminalUnavailable);
            }
        };
        if let Err(err) = write_all_fd(self.output_fd, BRACKETED_PASTE_ON.as_bytes()) {
            tracing::warn!(error = %err, "could not enable bracketed paste");
            drop(guard);
            return Err(TuiError::TerminalUnavailable);
        }

        self.buffer.clear();
        self.queue.clear();
        self.raw_mode = Some(guard);
        Ok(())
    }

    fn read(&mut self) -> Result<InputEvent> {
        self.ensure_active()?;
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(event);
            }
            self.pump(None)?;
        }
    }

    fn read_nonblocking(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        self.ensure_active()?;
        let end = Instant::now() + timeout;
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(Some(event));
            }
            let now = Instant::now();
            if now >= end {
                return Ok(None);
            }
            self.pump(Some(end - now))?;
        }
    }

    fn flush(&mut self) -> Result<()> {
        if self.raw_mode.is_some() {
            discard_input(self.input_fd)
                .map_err(|source| TuiError::io("discarding pending input", source))?;
        }
        self.buffer.clear();
        self.queue.clear();
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let Some(guard) = self.raw_mode.take() else {
            return Ok(());
        };
        // Best effort.
        let _ = write_all_fd(self.output_fd, BRACKETED_PASTE_OFF.as_bytes());
        let _ = discard_input(self.input_fd);
        self.buffer.clear();
        self.queue.clear();
        guard
            .restore()
            .map_err(|source| TuiError::io("restoring terminal settings", source))
    }

    fn is_active(&self) -> bool {
        self.raw_mode.is_some()
    }
}

impl Drop for RawInputReader {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            tracing::warn!(error = %err, "failed to stop raw input");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RawInputReader;
    use crate::core::input_event::{InputEvent, Key};
    use crate::core::input_source::InputSource;
    use crate::error::TuiError;
    use crate::platform::tty::tests::open_pty;
    use crate::platform::tty::{get_termios, write_all_fd};
    use std::time::Duration;

    fn reader_for(pty: &crate::platform::tty::tests::Pty) -> RawInputReader {
        RawInputReader::with_fds(pty.slave, pty.slave, Duration::from_millis(10))
    }

    #[test]
    fn not_started_reader_is_unavailable() {
        let pty = open_pty();
        let mut reader = reader_for(&pty);
        assert!(matches!(reader.read(), Err(TuiError::TerminalUnavailable)));
    }

    #[test]
    fn pipe_is_not_a_terminal() {
        let mut fds = [0; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let mut reader = RawInputReader::with_fds(fds[0], fds[1], Duration::from_millis(10));
        assert!(matches!(reader.start(), Err(TuiError::TerminalUnavailable)));
        assert!(!reader.is_active());
        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }

    #[test]
    fn decodes_keys_and_lone_escape() {
        let pty = open_pty();
        let mut reader = reader_for(&pty);
        reader.start().expect("start");

        write_all_fd(pty.master, b"a\x1b[A").expect("write");
        assert_eq!(reader.read().expect("a"), InputEvent::char('a'));
        assert_eq!(reader.read().expect("up").key, Key::Up);

        write_all_fd(pty.master, b"\x1b").expect("write");
        assert_eq!(reader.read().expect("esc").key, Key::Escape);

        reader.stop().expect("stop");
    }

    #[test]
    fn paste_arrives_as_one_event() {
        let pty = open_pty();
        let mut reader = reader_for(&pty);
        reader.start().expect("start");

        write_all_fd(pty.master, b"\x1b[200~one\rtwo\x1b[201~").expect("write");
        let event = reader.read().expect("paste");
        assert_eq!(event.key, Key::Paste);
        assert_eq!(event.text(), "one\rtwo");
    }

    #[test]
    fn nonblocking_read_times_out() {
        let pty = open_pty();
        let mut reader = reader_for(&pty);
        reader.start().expect("start");
        let event = reader
            .read_nonblocking(Duration::from_millis(20))
            .expect("read");
        assert!(event.is_none());
    }

    #[test]
    fn stop_restores_settings() {
        let pty = open_pty();
        let before = get_termios(pty.slave).expect("tcgetattr");
        let mut reader = reader_for(&pty);
        reader.start().expect("start");
        assert!(reader.is_active());
        reader.stop().expect("stop");
        assert!(!reader.is_active());
        assert_eq!(get_termios(pty.slave).expect("tcgetattr").c_lflag, before.c_lflag);
    }
}
