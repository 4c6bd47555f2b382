//! Console state: event log, input line, and the quit flag.
//!
//! [`ConsoleState`] is the [`DisplaySurface`] the dispatch chain writes to.

use chrono::{DateTime, Utc};
use rekl_core::help::welcome_text;
use rekl_core::{DisplaySurface, Level, ReportedEvent};

use crate::input::InputLine;

/// One entry in the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    /// `HH:MM` in UTC; `None` for the welcome banner.
    pub stamp: Option<String>,
    pub text: String,
}

/// Append-only log of reported events.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn push_at(&mut self, level: Level, text: &str, at: DateTime<Utc>) {
        self.entries.push(LogEntry {
            level,
            stamp: Some(at.format("%H:%M").to_string()),
            text: text.to_string(),
        });
    }

    /// Adds an entry without a timestamp.
    pub fn push_plain(&mut self, text: &str) {
        self.entries.push(LogEntry {
            level: Level::Info,
            stamp: None,
            text: text.to_string(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Everything the console renders apart from the status line.
#[derive(Debug, Default)]
pub struct ConsoleState {
    pub log: EventLog,
    pub input: InputLine,
    pub should_quit: bool,
}

impl ConsoleState {
    /// State with the welcome banner already in the log.
    pub fn new() -> Self {
        let mut state = Self::default();
        state.log.push_plain(&welcome_text());
        state
    }

    /// Writes an event that arrived from the send loop.
    pub fn push_reported(&mut self, event: &ReportedEvent) {
        self.report_event(event.level, &event.text);
    }
}

impl DisplaySurface for ConsoleState {
    fn report_event(&mut self, level: Level, text: &str) {
        self.log.push_at(level, text, Utc::now());
    }

    fn clear_event_log(&mut self) {
        self.log.clear();
    }

    fn current_input_text(&self) -> &str {
        self.input.text()
    }

    fn clear_input_text(&mut self) {
        self.input.clear();
    }

    fn request_shutdown(&mut self) {
        self.should_quit = true;
    }
}
