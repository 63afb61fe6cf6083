//! Input side of the terminal.

use std::time::Duration;

use super::input_event::InputEvent;
use crate::error::Result;

/// A stream of decoded key events with an explicit active period.
///
/// `start` fails with [`TuiError::TerminalUnavailable`](crate::TuiError::TerminalUnavailable)
/// when no interactive terminal backs the source; callers then fall back to line input.
pub trait InputSource: Send {
    fn start(&mut self) -> Result<()>;

    /// Blocks until the next event.
    fn read(&mut self) -> Result<InputEvent>;

    /// Waits at most `timeout` for the next event.
    fn read_nonblocking(&mut self, timeout: Duration) -> Result<Option<InputEvent>>;

    /// Drops input that arrived but has not been read (type-ahead).
    fn flush(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    fn is_active(&self) -> bool;
}

impl<S: InputSource + ?Sized> InputSource for Box<S> {
    fn start(&mut self) -> Result<()> {
        (**self).start()
    }

    fn read(&mut self) -> Result<InputEvent> {
        (**self).read()
    }

    fn read_nonblocking(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        (**self).read_nonblocking(timeout)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
