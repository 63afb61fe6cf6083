//! Line-based I/O used when no interactive terminal is available.

use std::io::{self, BufRead, Write};

use crate::error::{Result, TuiError};

pub trait LineIo: Send {
    fn print(&mut self, text: &str) -> Result<()>;

    /// Shows `prompt` and reads one line without its line ending. `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Plain stdin/stdout.
#[derive(Debug, Default)]
pub struct StdioLines;

impl LineIo for StdioLines {
    fn print(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|source| TuiError::io("writing prompt", source))
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.print(prompt)?;
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|source| TuiError::io("reading line", source))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
    }
}
