//! Unix terminal plumbing: termios raw mode, fd I/O and signals.

pub mod raw_input;
pub mod signals;
pub mod stdout_terminal;
pub mod tty;

pub use raw_input::RawInputReader;
pub use signals::{on_interrupt, InterruptGuard};
pub use stdout_terminal::StdoutTerminal;
pub use tty::RawModeGuard;
