//! Console runtime: owns the terminal and runs the event loop.
//!
//! ## Inbox Pattern
//!
//! The background send loop can't touch the UI. It reports through an
//! unbounded channel (the inbox) that the runtime drains each frame, writing
//! every [`ReportedEvent`] into the event log.
//!
//! Key handling is split off into [`App`], which needs no terminal and is
//! what the tests drive.

use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use rekl_core::dispatch::DispatchContext;
use rekl_core::{ConfigStore, Dispatcher, Disposition, ReportedEvent, SendQueue};
use tokio::sync::mpsc;

use crate::render::{self, StatusLine};
use crate::state::ConsoleState;
use crate::{input, terminal};

/// How long to wait for terminal input before redrawing the status line.
pub const POLL_DURATION: Duration = Duration::from_millis(50);

/// Receives events from the send loop.
pub type Inbox = mpsc::UnboundedReceiver<ReportedEvent>;

/// Console state plus the pieces the dispatch chain works on.
pub struct App {
    pub state: ConsoleState,
    pub store: ConfigStore,
    pub queue: SendQueue,
    dispatcher: Dispatcher,
    engine_name: &'static str,
}

impl App {
    pub fn new(store: ConfigStore, queue: SendQueue, engine_name: &'static str) -> Self {
        Self {
            state: ConsoleState::new(),
            store,
            queue,
            dispatcher: Dispatcher::standard(),
            engine_name,
        }
    }

    /// Handles one terminal event. Returns true if the screen needs a redraw.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.handle_key(&key);
                true
            }
            Event::Paste(text) => {
                self.state.input.insert_str(&text);
                true
            }
            Event::Resize(..) => true,
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if input::is_interrupt(key) {
            tracing::info!("interrupt key, quitting");
            self.state.should_quit = true;
            return;
        }

        let mut ctx = DispatchContext {
            store: &mut self.store,
            queue: &self.queue,
            surface: &mut self.state,
        };
        let disposition = self.dispatcher.dispatch(input::map_key(key), &mut ctx);
        if disposition == Disposition::PassThrough {
            self.state.input.input(key);
        }
    }

    /// Writes everything waiting in the inbox to the log. Returns true if
    /// anything arrived.
    pub fn drain_inbox(&mut self, inbox: &mut Inbox) -> bool {
        let mut any = false;
        while let Ok(event) = inbox.try_recv() {
            self.state.push_reported(&event);
            any = true;
        }
        any
    }

    pub fn status(&self) -> StatusLine {
        StatusLine {
            speed: self.store.speed(),
            pending: self.queue.len(),
            engine: self.engine_name,
        }
    }
}

/// Full-screen console runtime.
///
/// Owns the terminal; the terminal is restored on drop and on panic.
pub struct ConsoleRuntime {
    terminal: terminal::ConsoleTerminal,
    pub app: App,
    inbox: Inbox,
}

impl ConsoleRuntime {
    /// Enters the alternate screen and raw mode.
    ///
    /// # Errors
    /// Returns an error if the terminal can't be set up.
    pub fn new(app: App, inbox: Inbox) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        Ok(Self {
            terminal,
            app,
            inbox,
        })
    }

    /// Runs until `\quit` or Ctrl+C.
    ///
    /// # Errors
    /// Returns an error if reading terminal events or drawing fails.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true;
        let mut last_status = self.app.status();

        while !self.app.state.should_quit {
            if self.app.drain_inbox(&mut self.inbox) {
                dirty = true;
            }

            // The queue drains in the background, so the pending count can
            // change without any input.
            let status = self.app.status();
            if status != last_status {
                dirty = true;
            }

            if dirty {
                let state = &self.app.state;
                self.terminal
                    .draw(|frame| render::render(state, &status, frame))?;
                last_status = status;
                dirty = false;
            }

            if event::poll(POLL_DURATION)? {
                dirty |= self.app.handle_event(event::read()?);
                while !self.app.state.should_quit && event::poll(Duration::ZERO)? {
                    dirty |= self.app.handle_event(event::read()?);
                }
            }
        }

        Ok(())
    }
}

impl Drop for ConsoleRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
