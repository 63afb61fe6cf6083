#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nano_tui::elements::LineIo;
use nano_tui::{InputEvent, InputSource, Result, Terminal, TuiError};

/// Terminal that records every write; clones share the record.
#[derive(Clone)]
pub struct CaptureTerminal {
    writes: Arc<Mutex<Vec<String>>>,
    columns: u16,
}

impl CaptureTerminal {
    pub fn new(columns: u16) -> Self {
        Self {
            writes: Arc::new(Mutex::new(Vec::new())),
            columns,
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("lock writes").clone()
    }

    pub fn take_writes(&self) -> Vec<String> {
        std::mem::take(&mut *self.writes.lock().expect("lock writes"))
    }

    pub fn output(&self) -> String {
        self.writes().concat()
    }
}

impl Terminal for CaptureTerminal {
    fn write(&mut self, data: &str) -> io::Result<()> {
        self.writes.lock().expect("lock writes").push(data.to_owned());
        Ok(())
    }

    fn columns(&self) -> u16 {
        self.columns
    }

    fn rows(&self) -> u16 {
        24
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputLog {
    pub starts: usize,
    pub stops: usize,
    pub flushes: usize,
}

/// Input source fed from a script.
///
/// `typeahead` events are dropped by `flush`; `script` events survive it; after both run dry,
/// events come from the channel returned by [`ScriptedInput::live`].
pub struct ScriptedInput {
    pub typeahead: VecDeque<InputEvent>,
    pub script: VecDeque<InputEvent>,
    live: Option<Receiver<InputEvent>>,
    available: bool,
    active: bool,
    log: Arc<Mutex<InputLog>>,
}

impl ScriptedInput {
    pub fn new(script: Vec<InputEvent>) -> Self {
        Self {
            typeahead: VecDeque::new(),
            script: script.into(),
            live: None,
            available: true,
            active: false,
            log: Arc::new(Mutex::new(InputLog::default())),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn live() -> (Self, Sender<InputEvent>) {
        let (tx, rx) = channel();
        let mut input = Self::new(Vec::new());
        input.live = Some(rx);
        (input, tx)
    }

    pub fn with_typeahead(mut self, events: Vec<InputEvent>) -> Self {
        self.typeahead = events.into();
        self
    }

    pub fn log(&self) -> Arc<Mutex<InputLog>> {
        Arc::clone(&self.log)
    }
}

impl InputSource for ScriptedInput {
    fn start(&mut self) -> Result<()> {
        if !self.available {
            return Err(TuiError::TerminalUnavailable);
        }
        self.active = true;
        self.log.lock().expect("log").starts += 1;
        Ok(())
    }

    fn read(&mut self) -> Result<InputEvent> {
        if let Some(event) = self.typeahead.pop_front().or_else(|| self.script.pop_front()) {
            return Ok(event);
        }
        match &self.live {
            Some(rx) => rx.recv().map_err(|_| TuiError::InputClosed),
            None => Err(TuiError::InputClosed),
        }
    }

    fn read_nonblocking(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        if let Some(event) = self.typeahead.pop_front().or_else(|| self.script.pop_front()) {
            return Ok(Some(event));
        }
        match &self.live {
            Some(rx) => Ok(rx.recv_timeout(timeout).ok()),
            None => Ok(None),
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.typeahead.clear();
        self.log.lock().expect("log").flushes += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.active = false;
        self.log.lock().expect("log").stops += 1;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Line I/O answering prompts from a fixed list and recording what was printed.
#[derive(Clone, Default)]
pub struct ScriptedLines {
    answers: Arc<Mutex<VecDeque<String>>>,
    printed: Arc<Mutex<String>>,
}

impl ScriptedLines {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.iter().map(|a| a.to_string()).collect())),
            printed: Arc::new(Mutex::new(String::new())),
        }
    }

    pub fn printed(&self) -> String {
        self.printed.lock().expect("printed").clone()
    }
}

impl LineIo for ScriptedLines {
    fn print(&mut self, text: &str) -> Result<()> {
        self.printed.lock().expect("printed").push_str(text);
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.print(prompt)?;
        Ok(self.answers.lock().expect("answers").pop_front())
    }
}

pub fn chars(text: &str) -> Vec<InputEvent> {
    text.chars().map(InputEvent::char).collect()
}
