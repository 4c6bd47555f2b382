use super::{DispatchContext, InputEvent, InputHandler, Outcome};
use crate::display::Level;

/// Sends any submitted line no earlier handler claimed.
pub struct PlainTextHandler;

impl InputHandler for PlainTextHandler {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn handle(&self, event: &InputEvent, ctx: &mut DispatchContext<'_>) -> Outcome {
        let Some(line) = event.submitted() else {
            return Outcome::Declined;
        };
        if line.trim().is_empty() {
            return Outcome::Handled;
        }

        let message = line.to_uppercase();
        match ctx.queue.enqueue(message.as_str()) {
            Ok(()) => {
                let text = format!("Sending: {message}");
                ctx.surface.report_event(Level::Info, &text);
                ctx.surface.clear_input_text();
            }
            Err(err) => ctx.surface.report_event(Level::Error, &err.to_string()),
        }
        Outcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::super::{Disposition, KeyInput};
    use super::*;

    #[test]
    fn test_plain_text_is_uppercased_and_queued() {
        let mut h = Harness::new();
        assert_eq!(h.submit("cq de k3gds"), Disposition::PassThrough);
        assert_eq!(h.queue.len(), 1);
        assert_eq!(h.surface.last_event(), "Sending: CQ DE K3GDS");
        assert_eq!(h.surface.input, "");
    }

    #[test]
    fn test_unsendable_text_is_kept() {
        let mut h = Harness::new();
        h.submit("price $5");
        assert!(h.queue.is_empty());
        assert_eq!(h.surface.last_level(), Some(Level::Error));
        assert_eq!(h.surface.last_event(), "message contains unsupported rune $");
        assert_eq!(h.surface.input, "price $5");
    }

    #[test]
    fn test_blank_submission_is_ignored() {
        let mut h = Harness::new();
        h.submit("   ");
        assert!(h.queue.is_empty());
        assert!(h.surface.events.is_empty());
    }

    #[test]
    fn test_typing_is_not_sent() {
        let mut h = Harness::new();
        h.surface.input = "CQ".into();
        h.press(KeyInput::Char('Q'));
        assert!(h.queue.is_empty());
    }

    #[test]
    fn test_messages_queue_in_order() {
        let mut h = Harness::new();
        h.submit("one");
        h.submit("two");
        assert_eq!(h.queue.len(), 2);
    }
}
