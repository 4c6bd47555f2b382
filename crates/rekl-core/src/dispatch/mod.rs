//! Input dispatch chain.
//!
//! Every keystroke or submitted line runs through an ordered list of handlers.
//! The first handler that claims the event ends the chain; an event nobody
//! claims falls through to the display surface's default key handling.
//!
//! Structure:
//! - `hotkeys.rs`: speed up/down, stop, and message-slot hotkeys
//! - `command.rs`: backslash commands (`\speed`, `\3=...`, `\config`, ...)
//! - `send.rs`: plain text sent as CW
//!
//! The order in [`Dispatcher::standard`] matters: `\stop` must be matched
//! before the generic command parser would call it unknown, and every command
//! must be matched before plain-text sending.

mod command;
mod hotkeys;
mod send;

pub use command::{Command, MESSAGE_SLOT_KEYS, SlashCommandHandler};
pub use hotkeys::{MessageHotkeyHandler, SpeedDownHandler, SpeedUpHandler, StopHandler};
pub use send::PlainTextHandler;

use crate::display::DisplaySurface;
use crate::queue::SendQueue;
use crate::store::ConfigStore;

/// Terminal-independent key, mapped from the front end's key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Escape.
    Cancel,
    /// Enter: submits the staged line.
    Submit,
    /// A printable character.
    Char(char),
    /// Anything else (editing keys, function keys, ...).
    Other,
}

/// A key plus the line staged when it was pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub key: KeyInput,
    pub line: String,
}

impl InputEvent {
    pub fn new(key: KeyInput, line: impl Into<String>) -> Self {
        Self {
            key,
            line: line.into(),
        }
    }

    /// Returns the staged line if this event submits it.
    pub fn submitted(&self) -> Option<&str> {
        (self.key == KeyInput::Submit).then_some(self.line.as_str())
    }
}

/// What a handler did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Handled; the key must not reach the input field.
    Consumed,
    /// Handled; the key's default handling still runs.
    Handled,
    /// Not for this handler; try the next one.
    Declined,
}

/// What the front end should do with the key after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Suppress,
    PassThrough,
}

/// Everything a handler may touch.
pub struct DispatchContext<'a> {
    pub store: &'a mut ConfigStore,
    pub queue: &'a SendQueue,
    pub surface: &'a mut dyn DisplaySurface,
}

/// One link of the chain.
pub trait InputHandler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn handle(&self, event: &InputEvent, ctx: &mut DispatchContext<'_>) -> Outcome;
}

/// Ordered chain of input handlers.
pub struct Dispatcher {
    handlers: Vec<Box<dyn InputHandler>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::standard()
    }
}

impl Dispatcher {
    /// Builds the chain in its required precedence order.
    pub fn standard() -> Self {
        Self::with_handlers(vec![
            Box::new(SpeedUpHandler),
            Box::new(SpeedDownHandler),
            Box::new(StopHandler),
            Box::new(SlashCommandHandler),
            Box::new(MessageHotkeyHandler),
            Box::new(PlainTextHandler),
        ])
    }

    pub fn with_handlers(handlers: Vec<Box<dyn InputHandler>>) -> Self {
        Self { handlers }
    }

    /// Names of the handlers in the order they are tried.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Runs `key` through the chain, snapshotting the staged line first.
    pub fn dispatch(&self, key: KeyInput, ctx: &mut DispatchContext<'_>) -> Disposition {
        let event = InputEvent::new(key, ctx.surface.current_input_text());
        for handler in &self.handlers {
            match handler.handle(&event, ctx) {
                Outcome::Declined => {}
                Outcome::Consumed => {
                    tracing::trace!(handler = handler.name(), "input consumed");
                    return Disposition::Suppress;
                }
                Outcome::Handled => {
                    tracing::trace!(handler = handler.name(), "input handled");
                    return Disposition::PassThrough;
                }
            }
        }
        Disposition::PassThrough
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::*;
    use crate::display::Level;
    use crate::morse::MorseAlphabet;

    /// In-memory display surface.
    #[derive(Default)]
    pub struct FakeSurface {
        pub events: Vec<(Level, String)>,
        pub input: String,
        pub shutdown_requested: bool,
    }

    impl FakeSurface {
        pub fn last_event(&self) -> &str {
            self.events.last().map_or("", |(_, text)| text.as_str())
        }

        pub fn last_level(&self) -> Option<Level> {
            self.events.last().map(|(level, _)| *level)
        }
    }

    impl DisplaySurface for FakeSurface {
        fn report_event(&mut self, level: Level, text: &str) {
            self.events.push((level, text.to_string()));
        }

        fn clear_event_log(&mut self) {
            self.events.clear();
        }

        fn current_input_text(&self) -> &str {
            &self.input
        }

        fn clear_input_text(&mut self) {
            self.input.clear();
        }

        fn request_shutdown(&mut self) {
            self.shutdown_requested = true;
        }
    }

    /// Store, queue and surface wired together for dispatch tests.
    pub struct Harness {
        pub store: ConfigStore,
        pub queue: SendQueue,
        pub surface: FakeSurface,
        pub dispatcher: Dispatcher,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                store: ConfigStore::morse(),
                queue: SendQueue::new(Arc::new(MorseAlphabet)),
                surface: FakeSurface::default(),
                dispatcher: Dispatcher::standard(),
            }
        }

        pub fn press(&mut self, key: KeyInput) -> Disposition {
            let mut ctx = DispatchContext {
                store: &mut self.store,
                queue: &self.queue,
                surface: &mut self.surface,
            };
            self.dispatcher.dispatch(key, &mut ctx)
        }

        /// Stages `line` and presses Enter.
        pub fn submit(&mut self, line: &str) -> Disposition {
            self.surface.input = line.to_string();
            self.press(KeyInput::Submit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;

    #[test]
    fn test_standard_order() {
        assert_eq!(
            Dispatcher::standard().handler_names(),
            vec![
                "speed-up",
                "speed-down",
                "stop",
                "slash-command",
                "message-hotkey",
                "plain-text",
            ]
        );
    }

    #[test]
    fn test_unclaimed_key_passes_through() {
        let mut h = Harness::new();
        h.surface.input = "CQ".into();
        assert_eq!(h.press(KeyInput::Char('x')), Disposition::PassThrough);
        assert_eq!(h.press(KeyInput::Other), Disposition::PassThrough);
        assert!(h.surface.events.is_empty());
        assert_eq!(h.surface.input, "CQ");
    }

    #[test]
    fn test_empty_chain_passes_everything_through() {
        let mut h = Harness::new();
        h.dispatcher = Dispatcher::with_handlers(Vec::new());
        assert_eq!(h.submit("\\quit"), Disposition::PassThrough);
        assert!(!h.surface.shutdown_requested);
    }

    #[test]
    fn test_submitted_only_on_enter() {
        assert_eq!(
            InputEvent::new(KeyInput::Submit, "CQ").submitted(),
            Some("CQ")
        );
        assert_eq!(InputEvent::new(KeyInput::Up, "CQ").submitted(), None);
    }
}
