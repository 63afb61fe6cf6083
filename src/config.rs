//! Environment configuration.

use std::env;
use std::path::PathBuf;

const DEFAULT_ESCAPE_TIMEOUT_MS: u64 = 10;
const DEFAULT_STATUS_TICK_MS: u64 = 80;

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log_file: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub escape_timeout_ms: u64,
    pub status_tick_ms: u64,
    pub no_color: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            log_filter: None,
            escape_timeout_ms: DEFAULT_ESCAPE_TIMEOUT_MS,
            status_tick_ms: DEFAULT_STATUS_TICK_MS,
            no_color: false,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            log_file: env_string_opt("NANO_TUI_LOG_FILE").map(PathBuf::from),
            log_filter: env_string_opt("NANO_TUI_LOG").or_else(|| env_string_opt("RUST_LOG")),
            escape_timeout_ms: env_u64("NANO_TUI_ESC_TIMEOUT_MS")
                .unwrap_or(DEFAULT_ESCAPE_TIMEOUT_MS),
            status_tick_ms: env_u64("NANO_TUI_STATUS_TICK_MS")
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_STATUS_TICK_MS),
            no_color: env_flag("NANO_TUI_NO_COLOR"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_u64(key: &str) -> Option<u64> {
    env_string_opt(key).and_then(|value| value.trim().parse().ok())
}
