//! Backslash commands entered on the input line.

use super::hotkeys::report_speed;
use super::{DispatchContext, InputEvent, InputHandler, Outcome};
use crate::display::Level;
use crate::help::HELP_TEXT;

/// Prefix that marks a line as a command.
pub const COMMAND_PREFIX: char = '\\';

/// Handled by the stop hotkey before command parsing.
pub const STOP_COMMAND: &str = "\\stop";

/// Shifted digits on a US keyboard, indexed by slot (`)` is Shift+0).
pub const MESSAGE_SLOT_KEYS: [char; 10] = [')', '!', '@', '#', '$', '%', '^', '&', '*', '('];

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `\speed` or `\speed N`.
    Speed(Option<&'a str>),
    /// `\N`, `\N=TEXT` or `\N TEXT`.
    SetMessage { slot: i32, text: &'a str },
    Config,
    Help,
    Clear,
    Quit,
    /// Any other token starting with a backslash.
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parses a line, returning `None` if it isn't a command at all.
    pub fn parse(line: &'a str) -> Option<Self> {
        let body = line.strip_prefix(COMMAND_PREFIX)?;

        if let Some(command) = Self::parse_slot(body) {
            return Some(command);
        }

        let (token, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();
        let command = match token {
            "\\speed" => Command::Speed((!arg.is_empty()).then_some(arg)),
            "\\config" => Command::Config,
            "\\help" => Command::Help,
            "\\clear" => Command::Clear,
            "\\quit" => Command::Quit,
            _ => Command::Unknown(token),
        };
        Some(command)
    }

    fn parse_slot(body: &'a str) -> Option<Self> {
        let mut chars = body.chars();
        let slot = chars.next()?.to_digit(10)? as i32;
        let rest = chars.as_str();
        let text = if rest.is_empty() {
            ""
        } else if let Some(text) = rest.strip_prefix('=') {
            text
        } else {
            rest.strip_prefix(' ')?
        };
        Some(Command::SetMessage { slot, text })
    }
}

/// Runs backslash commands on submit.
pub struct SlashCommandHandler;

impl InputHandler for SlashCommandHandler {
    fn name(&self) -> &'static str {
        "slash-command"
    }

    fn handle(&self, event: &InputEvent, ctx: &mut DispatchContext<'_>) -> Outcome {
        let Some(command) = event.submitted().and_then(Command::parse) else {
            return Outcome::Declined;
        };
        tracing::debug!(?command, "command");

        match command {
            Command::Speed(None) => {
                let text = format!("The CW speed is {} WPM.", ctx.store.speed());
                ctx.surface.report_event(Level::Info, &text);
                ctx.surface.clear_input_text();
            }
            Command::Speed(Some(arg)) => {
                match arg.parse::<i32>() {
                    Ok(speed) => {
                        let result = ctx.store.set_speed(speed);
                        report_speed(ctx, result);
                    }
                    Err(_) => {
                        let text = format!("Unable to parse speed argument: {arg}");
                        ctx.surface.report_event(Level::Error, &text);
                    }
                }
                ctx.surface.clear_input_text();
            }
            Command::SetMessage { slot, text } => match ctx.store.set_message(slot, text) {
                Ok(()) => {
                    let saved = ctx.store.message(slot).unwrap_or_default();
                    let text = format!("Saved message {slot}: {saved}");
                    ctx.surface.report_event(Level::Info, &text);
                    ctx.surface.clear_input_text();
                }
                // Keep the line so the message can be corrected.
                Err(err) => ctx.surface.report_event(Level::Error, &err.to_string()),
            },
            Command::Config => {
                let report = ctx.store.describe();
                ctx.surface.report_event(Level::Info, &report);
                ctx.surface.clear_input_text();
            }
            Command::Help => {
                ctx.surface.report_event(Level::Info, HELP_TEXT);
                ctx.surface.clear_input_text();
            }
            Command::Clear => {
                ctx.surface.clear_event_log();
                ctx.surface.clear_input_text();
            }
            Command::Quit => ctx.surface.request_shutdown(),
            Command::Unknown(token) => {
                let text = format!("unknown command {token}");
                ctx.surface.report_event(Level::Error, &text);
            }
        }
        Outcome::Handled
    }
}
