//! Output channels for rendered log lines.
//!
//! A sink receives one finished JSON line per enabled log call. The console
//! sink mirrors the usual console split: debug and info lines on stdout, warn
//! and error lines on stderr.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::Value as JsonValue;

/// The output channel a line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Log,
    Info,
    Warn,
    Error,
}

/// Destination for rendered log lines. Implementations must not panic.
pub trait LogSink {
    fn emit(&self, channel: Channel, line: &str);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn emit(&self, channel: Channel, line: &str) {
        (**self).emit(channel, line);
    }
}

/// Writes to the process's stdout and stderr. Write errors are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn emit(&self, channel: Channel, line: &str) {
        let _ = match channel {
            Channel::Log | Channel::Info => writeln!(io::stdout().lock(), "{}", line),
            Channel::Warn | Channel::Error => writeln!(io::stderr().lock(), "{}", line),
        };
    }
}

/// Keeps every emitted line in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(Channel, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of everything emitted so far.
    pub fn lines(&self) -> Vec<(Channel, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Drains the buffer.
    pub fn take(&self) -> Vec<(Channel, String)> {
        self.lines
            .lock()
            .map(|mut l| std::mem::take(&mut *l))
            .unwrap_or_default()
    }

    /// Emitted lines parsed back into JSON. Unparseable lines are skipped.
    pub fn records(&self) -> Vec<JsonValue> {
        self.lines()
            .iter()
            .filter_map(|(_, line)| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn emit(&self, channel: Channel, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((channel, line.to_string()));
        }
    }
}
