//! Terminal footer: element content plus a status bar, drawn through a [`Region`].
//!
//! Every mutation and every render takes the same lock, so the status ticker thread and the
//! input loop never interleave partial frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::EnvConfig;
use crate::core::ansi::{DIM, RESET};
use crate::error::{Result, TuiError};
use crate::runtime::region::Region;

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterState {
    Inactive,
    Active,
    Paused,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBar {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_tokens: u64,
    pub thinking_tokens: u64,
    pub activity: Option<String>,
    pub spinner_frame: usize,
}

impl StatusBar {
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn line(&self, color: bool) -> String {
        let mut parts = Vec::new();
        if let Some(activity) = self.activity.as_deref() {
            let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            parts.push(format!("{frame} {activity}"));
        }

        let mut counters = format!(
            "tokens: {} in · {} out",
            compact_count(self.input_tokens),
            compact_count(self.output_tokens)
        );
        if self.cache_tokens > 0 {
            counters.push_str(&format!(" · {} cached", compact_count(self.cache_tokens)));
        }
        if self.thinking_tokens > 0 {
            counters.push_str(&format!(" · {} thinking", compact_count(self.thinking_tokens)));
        }
        parts.push(counters);

        let line = parts.join("  ");
        if color {
            format!("{DIM}{line}{RESET}")
        } else {
            line
        }
    }
}

/// `950`, `1.2k`, `12k`, `3.4M`.
pub fn compact_count(count: u64) -> String {
    fn scaled(value: f64, suffix: &str) -> String {
        if value >= 10.0 {
            format!("{}{suffix}", value.round() as u64)
        } else {
            let text = format!("{value:.1}");
            format!("{}{suffix}", text.trim_end_matches(".0"))
        }
    }

    match count {
        0..=999 => count.to_string(),
        // 999_500 and up would round to "1000k".
        1_000..=999_499 => scaled(count as f64 / 1_000.0, "k"),
        _ => scaled(count as f64 / 1_000_000.0, "M"),
    }
}

struct FooterInner<R> {
    region: R,
    state: FooterState,
    content: Vec<String>,
    status: StatusBar,
    color: bool,
}

impl<R: Region> FooterInner<R> {
    fn lines(&self) -> Vec<String> {
        let mut lines = self.content.clone();
        lines.push(self.status.line(self.color));
        lines
    }

    fn render(&mut self) -> Result<()> {
        if self.state != FooterState::Active {
            return Ok(());
        }
        let lines = self.lines();
        self.region.render(&lines)
    }

    fn show(&mut self) -> Result<()> {
        self.region.activate(self.content.len() + 1)?;
        self.state = FooterState::Active;
        self.render()
    }
}

pub struct TerminalFooter<R: Region> {
    inner: Mutex<FooterInner<R>>,
}

impl<R: Region> TerminalFooter<R> {
    pub fn new(region: R) -> Self {
        Self::with_color(region, true)
    }

    /// Colors follow `NANO_TUI_NO_COLOR`.
    pub fn from_config(region: R, config: &EnvConfig) -> Self {
        Self::with_color(region, !config.no_color)
    }

    pub fn with_color(region: R, color: bool) -> Self {
        Self {
            inner: Mutex::new(FooterInner {
                region,
                state: FooterState::Inactive,
                content: Vec::new(),
                status: StatusBar::default(),
                color,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FooterInner<R>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts drawing. Resumes instead when paused; no-op when already active.
    pub fn activate(&self) -> Result<()> {
        let mut inner = self.lock();
        match inner.state {
            FooterState::Active => Ok(()),
            FooterState::Paused | FooterState::Inactive => {
                tracing::debug!(from = ?inner.state, "footer activating");
                inner.show()
            }
        }
    }

    /// Erases the footer and stops drawing until [`resume`](Self::resume). Content and status
    /// are kept.
    pub fn pause(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.state != FooterState::Active {
            return Ok(());
        }
        inner.region.deactivate()?;
        inner.state = FooterState::Paused;
        tracing::debug!("footer paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.state != FooterState::Paused {
            return Ok(());
        }
        tracing::debug!("footer resumed");
        inner.show()
    }

    pub fn deactivate(&self) -> Result<()> {
        let mut inner = self.lock();
        match inner.state {
            FooterState::Inactive => return Ok(()),
            FooterState::Active => inner.region.deactivate()?,
            FooterState::Paused => {}
        }
        inner.state = FooterState::Inactive;
        tracing::debug!("footer deactivated");
        Ok(())
    }

    pub fn state(&self) -> FooterState {
        self.lock().state
    }

    pub fn is_active(&self) -> bool {
        self.state() == FooterState::Active
    }

    pub fn set_content(&self, lines: Vec<String>) -> Result<()> {
        let mut inner = self.lock();
        inner.content = lines;
        inner.render()
    }

    pub fn clear_content(&self) -> Result<()> {
        self.set_content(Vec::new())
    }

    pub fn content(&self) -> Vec<String> {
        self.lock().content.clone()
    }

    pub fn update_status<F>(&self, update: F) -> Result<()>
    where
        F: FnOnce(&mut StatusBar),
    {
        let mut inner = self.lock();
        update(&mut inner.status);
        inner.render()
    }

    pub fn set_activity(&self, activity: Option<String>) -> Result<()> {
        self.update_status(|status| {
            if activity.is_none() {
                status.spinner_frame = 0;
            }
            status.activity = activity;
        })
    }

    pub fn status(&self) -> StatusBar {
        self.lock().status.clone()
    }

    /// Redraws content and status. No-op unless active.
    pub fn render(&self) -> Result<()> {
        self.lock().render()
    }

    /// Advances the spinner and redraws, only while an activity is shown.
    pub fn tick(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.status.activity.is_none() {
            return Ok(());
        }
        inner.status.advance_spinner();
        inner.render()
    }

    /// Usable width for element content.
    pub fn content_width(&self) -> usize {
        self.lock().region.columns()
    }

    /// First half of the in-place transition from element content to a printed message.
    ///
    /// Moves the cursor to the first content row without clearing and returns the number of
    /// content rows the caller may overwrite. Returns 0 when inactive, paused or empty.
    pub fn overwrite_content_with_message(&self) -> Result<usize> {
        let mut inner = self.lock();
        if inner.state != FooterState::Active || inner.content.is_empty() {
            return Ok(0);
        }
        inner.region.move_to_region_start()?;
        Ok(inner.content.len())
    }

    /// Second half of the transition: the caller printed `printed_lines` rows (ending with a
    /// newline). Those rows become scrollback and the footer shrinks to the status bar.
    pub fn finish_content_overwrite(&self, printed_lines: usize) -> Result<()> {
        let mut inner = self.lock();
        if inner.state != FooterState::Active {
            return Ok(());
        }
        inner.content.clear();
        inner.region.release_rows(printed_lines)?;
        inner.region.update_size(1)?;
        inner.render()
    }

    /// Prints finished output above the footer, then redraws the footer below it.
    pub fn print_above(&self, text: &str) -> Result<()> {
        let mut inner = self.lock();
        let mut out = text.replace("\r\n", "\n").replace('\n', "\r\n");
        if !out.ends_with("\r\n") {
            out.push_str("\r\n");
        }

        if inner.state != FooterState::Active {
            return inner.region.write_raw(&out);
        }
        inner.region.deactivate()?;
        inner.region.write_raw(&out)?;
        inner.show()
    }

    pub fn write_raw(&self, data: &str) -> Result<()> {
        self.lock().region.write_raw(data)
    }

    /// Runs `f` with the region while holding the footer lock.
    pub fn with_region<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.lock().region)
    }
}

/// Keeps the footer active for the guard's lifetime.
pub struct FooterSession<'a, R: Region> {
    footer: &'a TerminalFooter<R>,
}

impl<'a, R: Region> FooterSession<'a, R> {
    pub fn start(footer: &'a TerminalFooter<R>) -> Result<Self> {
        footer.activate()?;
        Ok(Self { footer })
    }

    pub fn footer(&self) -> &TerminalFooter<R> {
        self.footer
    }
}

impl<R: Region> Drop for FooterSession<'_, R> {
    fn drop(&mut self) {
        if let Err(err) = self.footer.deactivate() {
            tracing::warn!(error = %err, "failed to deactivate footer");
        }
    }
}

/// Background thread advancing the status spinner at a fixed period. Stops on drop.
pub struct StatusTicker {
    stop_flag: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl StatusTicker {
    pub fn start<R>(footer: Arc<TerminalFooter<R>>, period: Duration) -> Result<Self>
    where
        R: Region + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&stop_flag);
        let thread = thread::Builder::new()
            .name("nano-tui-status".to_owned())
            .spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    thread::park_timeout(period);
                    if stop.load(Ordering::SeqCst) {
                        break;
                    }
                    if let Err(err) = footer.tick() {
                        tracing::warn!(error = %err, "status tick failed");
                    }
                }
            })
            .map_err(|source| TuiError::io("spawning status ticker", source))?;

        Ok(Self {
            stop_flag,
            thread: Some(thread),
        })
    }

    /// Starts with the configured tick period.
    pub fn from_config<R>(footer: Arc<TerminalFooter<R>>, config: &EnvConfig) -> Result<Self>
    where
        R: Region + 'static,
    {
        Self::start(footer, Duration::from_millis(config.status_tick_ms))
    }

    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for StatusTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::{compact_count, StatusBar};

    #[test]
    fn compact_counts() {
        assert_eq!(compact_count(0), "0");
        assert_eq!(compact_count(950), "950");
        assert_eq!(compact_count(1_000), "1k");
        assert_eq!(compact_count(1_234), "1.2k");
        assert_eq!(compact_count(12_345), "12k");
        assert_eq!(compact_count(3_400_000), "3.4M");
        assert_eq!(compact_count(999_499), "999k");
        assert_eq!(compact_count(999_500), "1M");
        assert_eq!(compact_count(999_999), "1M");
    }

    #[test]
    fn status_line_without_color() {
        let status = StatusBar {
            input_tokens: 1_234,
            output_tokens: 56,
            cache_tokens: 2_000,
            activity: Some("Thinking".to_owned()),
            ..StatusBar::default()
        };
        assert_eq!(
            status.line(false),
            "⠋ Thinking  tokens: 1.2k in · 56 out · 2k cached"
        );
    }

    #[test]
    fn out_of_range_spinner_frame_wraps() {
        let status = StatusBar {
            spinner_frame: 42,
            activity: Some("Working".to_owned()),
            ..StatusBar::default()
        };
        assert!(status.line(false).starts_with("⠹ Working"));
    }

    #[test]
    fn spinner_wraps() {
        let mut status = StatusBar::default();
        for _ in 0..10 {
            status.advance_spinner();
        }
        assert_eq!(status.spinner_frame, 0);
    }
}
