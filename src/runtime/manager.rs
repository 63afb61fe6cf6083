//! Runs one active element at a time inside the footer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use super::footer::TerminalFooter;
use super::region::Region;
use crate::core::input_source::InputSource;
use crate::elements::fallback::{LineIo, StdioLines};
use crate::elements::{ActiveElement, Step};
use crate::error::{Result, TuiError};

/// What happens to the element's footer lines once it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    Clear,
    /// Left in place for `overwrite_content_with_message`.
    Keep,
}

pub struct ElementManager<R: Region, I: InputSource> {
    footer: Arc<TerminalFooter<R>>,
    input: Mutex<I>,
    fallback: Mutex<Box<dyn LineIo>>,
    active: AtomicBool,
}

impl<R: Region, I: InputSource> ElementManager<R, I> {
    pub fn new(footer: Arc<TerminalFooter<R>>, input: I) -> Self {
        Self::with_fallback(footer, input, Box::new(StdioLines))
    }

    pub fn with_fallback(footer: Arc<TerminalFooter<R>>, input: I, fallback: Box<dyn LineIo>) -> Self {
        Self {
            footer,
            input: Mutex::new(input),
            fallback: Mutex::new(fallback),
            active: AtomicBool::new(false),
        }
    }

    pub fn footer(&self) -> &Arc<TerminalFooter<R>> {
        &self.footer
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Runs `element` until it produces a result, then clears its footer lines.
    ///
    /// Fails with [`TuiError::ElementAlreadyActive`] while another `run` is in progress.
    pub fn run<E>(&self, element: &mut E) -> Result<Option<E::Output>>
    where
        E: ActiveElement + ?Sized,
    {
        self.run_with(element, Release::Clear)
    }

    /// Like [`run`](Self::run) but leaves the final frame in the footer, so the caller can
    /// replace it in place with `overwrite_content_with_message` and
    /// `finish_content_overwrite`.
    pub fn run_keeping_content<E>(&self, element: &mut E) -> Result<Option<E::Output>>
    where
        E: ActiveElement + ?Sized,
    {
        self.run_with(element, Release::Keep)
    }

    fn run_with<E>(&self, element: &mut E, release: Release) -> Result<Option<E::Output>>
    where
        E: ActiveElement + ?Sized,
    {
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::error!("element run requested while another element is active");
            return Err(TuiError::ElementAlreadyActive);
        }
        let _claim = Claim(&self.active);
        tracing::debug!(?release, "element run started");

        element.on_activate();
        let mut activation = Activation { element };
        let result = self.drive(&mut *activation.element);
        drop(activation);

        if release == Release::Clear {
            let cleared = self.footer.clear_content();
            if result.is_ok() {
                cleared?;
            } else if let Err(err) = cleared {
                tracing::warn!(error = %err, "failed to clear element content");
            }
        }
        match &result {
            Ok(output) => tracing::debug!(has_result = output.is_some(), "element run finished"),
            Err(err) => tracing::debug!(error = %err, "element run failed"),
        }
        result
    }

    fn drive<E>(&self, element: &mut E) -> Result<Option<E::Output>>
    where
        E: ActiveElement + ?Sized,
    {
        let input = self.input.lock().unwrap_or_else(|p| p.into_inner());
        let mut session = InputSession { input };

        if element.is_self_managed() {
            tracing::debug!("running self-managed element");
            return element.run_self_managed(&mut *session.input);
        }

        match session.input.start() {
            Ok(()) => {}
            Err(TuiError::TerminalUnavailable) => {
                drop(session);
                tracing::debug!("no terminal, using line fallback");
                let mut io = self.fallback.lock().unwrap_or_else(|p| p.into_inner());
                return element.run_fallback(&mut **io);
            }
            Err(err) => return Err(err),
        }

        self.footer.activate()?;
        self.render(element)?;
        session.input.flush()?;

        loop {
            let event = session.input.read()?;
            match element.handle_input(&event) {
                Step::Continue => self.render(element)?,
                Step::Done(result) => {
                    let delay = element.completion_delay();
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    return Ok(result);
                }
            }
        }
    }

    fn render<E>(&self, element: &mut E) -> Result<()>
    where
        E: ActiveElement + ?Sized,
    {
        element.set_render_width(self.footer.content_width());
        self.footer.set_content(element.get_lines())
    }
}

struct Claim<'a>(&'a AtomicBool);

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

struct Activation<'a, E: ActiveElement + ?Sized> {
    element: &'a mut E,
}

impl<E: ActiveElement + ?Sized> Drop for Activation<'_, E> {
    fn drop(&mut self) {
        self.element.on_deactivate();
    }
}

struct InputSession<'a, I: InputSource> {
    input: MutexGuard<'a, I>,
}

impl<I: InputSource> Drop for InputSession<'_, I> {
    fn drop(&mut self) {
        if !self.input.is_active() {
            return;
        }
        if let Err(err) = self.input.stop() {
            tracing::warn!(error = %err, "failed to stop input");
        }
    }
}
