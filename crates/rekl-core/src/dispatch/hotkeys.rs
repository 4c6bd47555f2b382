//! Single-keystroke actions.

use super::command::{MESSAGE_SLOT_KEYS, STOP_COMMAND};
use super::{DispatchContext, InputEvent, InputHandler, KeyInput, Outcome};
use crate::display::Level;
use crate::store::SpeedError;

pub(super) fn report_speed(ctx: &mut DispatchContext<'_>, result: Result<(), SpeedError>) {
    match result {
        Ok(()) => {
            let text = format!("The CW speed is {} WPM.", ctx.store.speed());
            ctx.surface.report_event(Level::Info, &text);
        }
        Err(err) => ctx.surface.report_event(Level::Error, &err.to_string()),
    }
}

/// Up arrow: one WPM faster.
pub struct SpeedUpHandler;

impl InputHandler for SpeedUpHandler {
    fn name(&self) -> &'static str {
        "speed-up"
    }

    fn handle(&self, event: &InputEvent, ctx: &mut DispatchContext<'_>) -> Outcome {
        if event.key != KeyInput::Up {
            return Outcome::Declined;
        }
        let result = ctx.store.increment_speed();
        report_speed(ctx, result);
        Outcome::Consumed
    }
}

/// Down arrow: one WPM slower.
pub struct SpeedDownHandler;

impl InputHandler for SpeedDownHandler {
    fn name(&self) -> &'static str {
        "speed-down"
    }

    fn handle(&self, event: &InputEvent, ctx: &mut DispatchContext<'_>) -> Outcome {
        if event.key != KeyInput::Down {
            return Outcome::Declined;
        }
        let result = ctx.store.decrement_speed();
        report_speed(ctx, result);
        Outcome::Consumed
    }
}

/// Esc or `\stop`: drop everything queued and abort the current send.
pub struct StopHandler;

impl InputHandler for StopHandler {
    fn name(&self) -> &'static str {
        "stop"
    }

    fn handle(&self, event: &InputEvent, ctx: &mut DispatchContext<'_>) -> Outcome {
        let from_command = event.submitted() == Some(STOP_COMMAND);
        if event.key != KeyInput::Cancel && !from_command {
            return Outcome::Declined;
        }
        ctx.queue.drain_now();
        ctx.surface.report_event(Level::Info, "All messages stopped.");
        if from_command {
            ctx.surface.clear_input_text();
            Outcome::Handled
        } else {
            Outcome::Consumed
        }
    }
}

/// Shift+digit with an empty input line: send a saved message.
pub struct MessageHotkeyHandler;

impl InputHandler for MessageHotkeyHandler {
    fn name(&self) -> &'static str {
        "message-hotkey"
    }

    fn handle(&self, event: &InputEvent, ctx: &mut DispatchContext<'_>) -> Outcome {
        let KeyInput::Char(c) = event.key else {
            return Outcome::Declined;
        };
        // Only when idle, so these symbols can still be typed into a message.
        if !event.line.is_empty() {
            return Outcome::Declined;
        }
        let Some(slot) = MESSAGE_SLOT_KEYS.iter().position(|&k| k == c) else {
            return Outcome::Declined;
        };
        let slot = slot as i32;

        let message = match ctx.store.message(slot) {
            Ok("") => {
                let text = format!("Message {slot} is empty.");
                ctx.surface.report_event(Level::Error, &text);
                return Outcome::Consumed;
            }
            Ok(message) => message.to_string(),
            Err(err) => {
                ctx.surface.report_event(Level::Error, &err.to_string());
                return Outcome::Consumed;
            }
        };

        match ctx.queue.enqueue(message.as_str()) {
            Ok(()) => {
                let text = format!("Sending: {message}");
                ctx.surface.report_event(Level::Info, &text);
            }
            Err(err) => ctx.surface.report_event(Level::Error, &err.to_string()),
        }
        Outcome::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::super::Disposition;
    use super::super::test_support::Harness;
    use super::*;
    use crate::store::{INIT_SPEED, MAX_SPEED, MIN_SPEED};

    #[test]
    fn test_up_increments_regardless_of_input() {
        let mut h = Harness::new();
        h.surface.input = "\\speed 40".into();

        assert_eq!(h.press(KeyInput::Up), Disposition::Suppress);
        assert_eq!(h.store.speed(), INIT_SPEED + 1);
        assert_eq!(h.surface.last_event(), "The CW speed is 19 WPM.");
        assert_eq!(h.surface.input, "\\speed 40");
    }

    #[test]
    fn test_down_decrements() {
        let mut h = Harness::new();
        h.press(KeyInput::Down);
        assert_eq!(h.store.speed(), INIT_SPEED - 1);
    }

    #[test]
    fn test_up_at_max_reports_error_once() {
        let mut h = Harness::new();
        h.store.set_speed(MAX_SPEED).unwrap();

        assert_eq!(h.press(KeyInput::Up), Disposition::Suppress);
        assert_eq!(h.store.speed(), MAX_SPEED);
        // The unchanged speed is not reported a second time.
        assert_eq!(h.surface.events.len(), 1);
        assert_eq!(h.surface.last_level(), Some(Level::Error));
        assert_eq!(h.surface.last_event(), "new speed is above maximum of 50");
    }

    #[test]
    fn test_down_at_min_reports_error() {
        let mut h = Harness::new();
        h.store.set_speed(MIN_SPEED).unwrap();
        h.press(KeyInput::Down);
        assert_eq!(h.store.speed(), MIN_SPEED);
        assert_eq!(h.surface.last_event(), "new speed is below minimum of 5");
    }

    #[test]
    fn test_escape_drains_queue() {
        let mut h = Harness::new();
        h.queue.enqueue("CQ CQ").unwrap();
        h.surface.input = "half typed".into();

        assert_eq!(h.press(KeyInput::Cancel), Disposition::Suppress);
        assert!(h.queue.is_empty());
        assert_eq!(h.surface.last_event(), "All messages stopped.");
        assert_eq!(h.surface.input, "half typed");
    }

    #[test]
    fn test_stop_command_drains_and_clears_input() {
        let mut h = Harness::new();
        h.queue.enqueue("CQ CQ").unwrap();

        h.submit("\\stop");
        assert!(h.queue.is_empty());
        assert_eq!(h.surface.last_event(), "All messages stopped.");
        assert_eq!(h.surface.input, "");
    }

    #[test]
    fn test_message_hotkey_sends_slot() {
        let mut h = Harness::new();
        h.store.set_message(1, "cq test").unwrap();

        assert_eq!(h.press(KeyInput::Char('!')), Disposition::Suppress);
        assert_eq!(h.queue.len(), 1);
        assert_eq!(h.surface.last_event(), "Sending: CQ TEST");
    }

    #[test]
    fn test_message_hotkey_maps_every_symbol() {
        let mut h = Harness::new();
        for slot in 0..10 {
            h.store.set_message(slot, &format!("M{slot}")).unwrap();
        }
        for (slot, symbol) in ")!@#$%^&*(".chars().enumerate() {
            h.press(KeyInput::Char(symbol));
            assert_eq!(h.surface.last_event(), format!("Sending: M{slot}"));
        }
        assert_eq!(h.queue.len(), 10);
    }

    #[test]
    fn test_message_hotkey_ignored_while_composing() {
        let mut h = Harness::new();
        h.store.set_message(2, "TU").unwrap();
        h.surface.input = "EMAIL ME".into();

        assert_eq!(h.press(KeyInput::Char('@')), Disposition::PassThrough);
        assert!(h.queue.is_empty());
        assert!(h.surface.events.is_empty());
    }

    #[test]
    fn test_message_hotkey_empty_slot_reports_error() {
        let mut h = Harness::new();
        assert_eq!(h.press(KeyInput::Char('(')), Disposition::Suppress);
        assert!(h.queue.is_empty());
        assert_eq!(h.surface.last_level(), Some(Level::Error));
        assert_eq!(h.surface.last_event(), "Message 9 is empty.");
    }
}
