//! Display surface and event sink seams.

use tokio::sync::mpsc;

/// Severity of a line written to the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// The UI operations the dispatch chain needs.
///
/// Implemented by the terminal front end; tests use an in-memory stand-in.
pub trait DisplaySurface {
    /// Appends a line to the event log.
    fn report_event(&mut self, level: Level, text: &str);

    /// Removes every line from the event log.
    fn clear_event_log(&mut self);

    /// Returns the text currently staged in the input field.
    fn current_input_text(&self) -> &str;

    /// Empties the input field.
    fn clear_input_text(&mut self);

    /// Asks the application to exit after the current event.
    fn request_shutdown(&mut self);
}

/// An event produced off the UI thread, waiting to be written to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedEvent {
    pub level: Level,
    pub text: String,
}

/// Thread-safe reporting path for the background send loop.
pub trait EventSink: Send + Sync + 'static {
    fn report(&self, level: Level, text: String);
}

impl EventSink for mpsc::UnboundedSender<ReportedEvent> {
    fn report(&self, level: Level, text: String) {
        // Receiver is gone only during shutdown.
        let _ = self.send(ReportedEvent { level, text });
    }
}
