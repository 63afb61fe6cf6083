//! Diagnostics logging.
//!
//! The terminal belongs to the runtime, so tracing output always goes to a file. Without a
//! configured log file no subscriber is installed and every `tracing` macro is a no-op.

use std::fs::OpenOptions;

use crate::config::EnvConfig;
use crate::error::{Result, TuiError};

const DEFAULT_FILTER: &str = "info";

/// Installs the global tracing subscriber described by `config`.
///
/// Returns `Ok(false)` when logging is disabled.
pub fn init_tracing(config: &EnvConfig) -> Result<bool> {
    let Some(path) = config.log_file.as_ref() else {
        return Ok(false);
    };

    let directives = config
        .log_filter
        .clone()
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned());
    let filter = build_filter(&directives)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| TuiError::io("opening log file", source))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .try_init()
        .map_err(|err| TuiError::Logging(err.to_string()))?;

    tracing::info!(
        target: "diagnostics",
        version = env!("CARGO_PKG_VERSION"),
        log_file = %path.display(),
        log_filter = %directives,
        "tracing enabled"
    );

    Ok(true)
}

fn build_filter(directives: &str) -> Result<tracing_subscriber::EnvFilter> {
    tracing_subscriber::EnvFilter::try_new(directives).map_err(|err| TuiError::InvalidLogFilter {
        filter: directives.to_owned(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{build_filter, init_tracing};
    use crate::config::EnvConfig;
    use crate::error::TuiError;

    #[test]
    fn disabled_without_log_file() {
        let config = EnvConfig::default();
        assert!(!init_tracing(&config).expect("disabled logging is not an error"));
    }

    #[test]
    fn invalid_filter_is_reported() {
        let err = build_filter("nano_tui=verbose").expect_err("malformed filter");
        assert!(matches!(err, TuiError::InvalidLogFilter { .. }));
    }

    #[test]
    fn valid_filter_parses() {
        assert!(build_filter("nano_tui=debug,warn").is_ok());
    }

    // The only test that installs the global subscriber.
    #[test]
    fn writes_to_configured_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nano.log");
        let config = EnvConfig {
            log_file: Some(path.clone()),
            log_filter: Some("debug".to_owned()),
            ..EnvConfig::default()
        };

        assert!(init_tracing(&config).expect("logging enabled"));
        let contents = std::fs::read_to_string(&path).expect("log file");
        assert!(contents.contains("tracing enabled"));
    }
}
