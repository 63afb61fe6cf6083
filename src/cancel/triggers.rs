//! Sources that call [`CancellationToken::cancel`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::token::CancellationToken;
use crate::core::input_event::{InputEvent, Key};
use crate::core::input_source::InputSource;
use crate::error::{Result, TuiError};
use crate::platform::signals::{on_interrupt, InterruptGuard};

const ESCAPE_POLL: Duration = Duration::from_millis(50);

/// Cancels the token on SIGINT while alive.
pub struct SignalTrigger {
    _guard: InterruptGuard,
}

impl SignalTrigger {
    pub fn install(token: CancellationToken) -> Result<Self> {
        let guard = on_interrupt(move || token.cancel())?;
        Ok(Self { _guard: guard })
    }
}

fn is_escape(event: &InputEvent) -> bool {
    event.key == Key::Escape || event.is_ctrl('c')
}

/// Watches an input source on a background thread and calls `on_escape` for Escape or ctrl+c.
///
/// The source is started on the monitor thread and stopped before the thread exits.
pub struct EscapeMonitor {
    stop_flag: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EscapeMonitor {
    pub fn start<S, F>(mut source: S, on_escape: F) -> Result<Self>
    where
        S: InputSource + 'static,
        F: Fn() + Send + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&stop_flag);

        let thread = thread::Builder::new()
            .name("nano-tui-escape".to_owned())
            .spawn(move || {
                if let Err(err) = source.start() {
                    tracing::debug!(error = %err, "escape monitor has no terminal");
                    return;
                }
                while !stop.load(Ordering::Relaxed) {
                    match source.read_nonblocking(ESCAPE_POLL) {
                        Ok(Some(event)) if is_escape(&event) => {
                            tracing::debug!("escape pressed");
                            on_escape();
                        }
                        Ok(_) => {}
                        Err(err) => {
                            tracing::debug!(error = %err, "escape monitor stopped reading");
                            break;
                        }
                    }
                }
                if let Err(err) = source.stop() {
                    tracing::warn!(error = %err, "failed to stop escape monitor input");
                }
            })
            .map_err(|source| TuiError::io("spawning escape monitor", source))?;

        Ok(Self {
            stop_flag,
            thread: Some(thread),
        })
    }

    /// Convenience for cancelling `token` on Escape.
    pub fn for_token<S>(source: S, token: CancellationToken) -> Result<Self>
    where
        S: InputSource + 'static,
    {
        Self::start(source, move || token.cancel())
    }

    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for EscapeMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
