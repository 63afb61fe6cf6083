use std::sync::Arc;
use std::thread::{self, JoinHandle};

use signal_hook::iterator::{Handle, Signals};

use crate::error::{Result, TuiError};

/// Runs a callback on SIGINT until dropped.
pub struct InterruptGuard {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Installs `callback` as a SIGINT handler. While the guard lives, SIGINT no longer terminates
/// the process.
pub fn on_interrupt<F>(callback: F) -> Result<InterruptGuard>
where
    F: Fn() + Send + Sync + 'static,
{
    let mut signals = Signals::new([libc::SIGINT])
        .map_err(|source| TuiError::io("registering SIGINT handler", source))?;
    let handle = signals.handle();
    let callback = Arc::new(callback);

    let thread = thread::Builder::new()
        .name("nano-tui-sigint".to_owned())
        .spawn(move || {
            for signal in signals.forever() {
                tracing::debug!(signal, "interrupt received");
                callback();
            }
        })
        .map_err(|source| TuiError::io("spawning signal thread", source))?;

    Ok(InterruptGuard {
        handle,
        thread: Some(thread),
    })
}
