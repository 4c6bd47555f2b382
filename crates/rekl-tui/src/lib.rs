//! Full-screen terminal console for REKL.

pub mod input;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use rekl_core::{ConfigStore, DisplaySurface, Level, SendQueue};
pub use runtime::{App, ConsoleRuntime, Inbox};

/// Runs the console until the operator quits.
///
/// `warnings` are written to the event log after the welcome banner.
///
/// # Errors
/// Returns an error if stdout isn't a terminal or the terminal fails.
pub fn run_console(
    store: ConfigStore,
    queue: SendQueue,
    inbox: Inbox,
    engine_name: &'static str,
    warnings: &[String],
) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!("REKL requires a terminal.");
    }

    let mut app = App::new(store, queue, engine_name);
    for warning in warnings {
        app.state.report_event(Level::Error, warning);
    }

    let mut runtime = ConsoleRuntime::new(app, inbox)?;
    runtime.run()
}
