//! Bounded configuration store: sending speed and the ten message slots.

use std::fmt::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::engine::{Alphabet, SpeedProvider};
use crate::morse;

/// Speed the console starts with.
pub const INIT_SPEED: i32 = 18;
/// Slowest accepted speed.
pub const MIN_SPEED: i32 = 5;
/// Fastest accepted speed.
pub const MAX_SPEED: i32 = 50;
/// Number of message slots (addressed 0-9).
pub const SLOT_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpeedError {
    #[error("new speed is below minimum of {MIN_SPEED}")]
    BelowMinimum,
    #[error("new speed is above maximum of {MAX_SPEED}")]
    AboveMaximum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("message number out of range")]
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("message number out of range")]
    OutOfRange,
    #[error("message contains unsupported rune {0}")]
    UnsendableCharacter(char),
}

impl From<SlotError> for MessageError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::OutOfRange => MessageError::OutOfRange,
        }
    }
}

/// Read-only view of the speed for the keyer thread.
///
/// Cloned out of the store; always observes the last committed value.
#[derive(Debug, Clone)]
pub struct SpeedHandle(Arc<AtomicI32>);

impl SpeedProvider for SpeedHandle {
    fn speed(&self) -> i32 {
        self.0.load(Ordering::Acquire)
    }
}

/// Current speed and saved messages.
///
/// Only the UI thread mutates the store. The speed is also read by the keyer
/// through [`SpeedHandle`].
pub struct ConfigStore {
    speed: Arc<AtomicI32>,
    messages: [String; SLOT_COUNT],
    alphabet: Arc<dyn Alphabet>,
}

impl ConfigStore {
    /// Creates a store at [`INIT_SPEED`] with empty slots.
    pub fn new(alphabet: Arc<dyn Alphabet>) -> Self {
        Self {
            speed: Arc::new(AtomicI32::new(INIT_SPEED)),
            messages: Default::default(),
            alphabet,
        }
    }

    /// Creates a store that validates against the Morse alphabet.
    pub fn morse() -> Self {
        Self::new(Arc::new(morse::MorseAlphabet))
    }

    pub fn speed(&self) -> i32 {
        self.speed.load(Ordering::Acquire)
    }

    /// Returns a handle the keyer uses to follow speed changes.
    pub fn speed_handle(&self) -> SpeedHandle {
        SpeedHandle(Arc::clone(&self.speed))
    }

    /// Sets the speed, rejecting values outside `MIN_SPEED..=MAX_SPEED`.
    ///
    /// # Errors
    /// Returns an error if the speed is out of bounds; the speed is unchanged.
    pub fn set_speed(&mut self, speed: i32) -> Result<(), SpeedError> {
        if speed < MIN_SPEED {
            return Err(SpeedError::BelowMinimum);
        }
        if speed > MAX_SPEED {
            return Err(SpeedError::AboveMaximum);
        }
        self.speed.store(speed, Ordering::Release);
        Ok(())
    }

    /// Raises the speed by one WPM.
    ///
    /// # Errors
    /// Fails at [`MAX_SPEED`] without changing the speed.
    pub fn increment_speed(&mut self) -> Result<(), SpeedError> {
        self.set_speed(self.speed().saturating_add(1))
    }

    /// Lowers the speed by one WPM.
    ///
    /// # Errors
    /// Fails at [`MIN_SPEED`] without changing the speed.
    pub fn decrement_speed(&mut self) -> Result<(), SpeedError> {
        self.set_speed(self.speed().saturating_sub(1))
    }

    /// Returns the message in a slot, empty if never set.
    ///
    /// # Errors
    /// Returns [`SlotError::OutOfRange`] unless `0 <= slot <= 9`.
    pub fn message(&self, slot: i32) -> Result<&str, SlotError> {
        let index = slot_index(slot)?;
        Ok(&self.messages[index])
    }

    /// Trims, upper-cases, validates and stores a message.
    ///
    /// # Errors
    /// Fails on a bad slot or the first unsendable rune; the slot is unchanged.
    pub fn set_message(&mut self, slot: i32, raw: &str) -> Result<(), MessageError> {
        let index = slot_index(slot)?;
        let message = raw.trim().to_uppercase();
        if let Some(c) = morse::first_unkeyable(self.alphabet.as_ref(), &message) {
            return Err(MessageError::UnsendableCharacter(c));
        }
        self.messages[index] = message;
        Ok(())
    }

    /// Renders the speed and every slot, with slot 0 last like a number row.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\nSpeed: {} WPM", self.speed());
        out.push_str("Messages:\n");
        for i in 1..=SLOT_COUNT {
            let slot = i % SLOT_COUNT;
            let _ = writeln!(out, "    {slot}: {}", self.messages[slot]);
        }
        out
    }
}

fn slot_index(slot: i32) -> Result<usize, SlotError> {
    usize::try_from(slot)
        .ok()
        .filter(|&index| index < SLOT_COUNT)
        .ok_or(SlotError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_speed_within_bounds() {
        for speed in MIN_SPEED..=MAX_SPEED {
            let mut store = ConfigStore::morse();
            assert!(store.set_speed(speed).is_ok());
            assert_eq!(store.speed(), speed);
        }
    }

    #[test]
    fn test_set_speed_out_of_bounds_keeps_speed() {
        let mut store = ConfigStore::morse();
        assert_eq!(store.set_speed(1), Err(SpeedError::BelowMinimum));
        assert_eq!(store.set_speed(MIN_SPEED - 1), Err(SpeedError::BelowMinimum));
        assert_eq!(store.set_speed(150), Err(SpeedError::AboveMaximum));
        assert_eq!(store.set_speed(i32::MAX), Err(SpeedError::AboveMaximum));
        assert_eq!(store.speed(), INIT_SPEED);
    }

    #[test]
    fn test_increment_stops_at_max() {
        let mut store = ConfigStore::morse();
        let mut expected = INIT_SPEED;
        while store.increment_speed().is_ok() {
            expected += 1;
            assert_eq!(store.speed(), expected);
        }
        assert_eq!(store.speed(), MAX_SPEED);
        assert_eq!(store.increment_speed(), Err(SpeedError::AboveMaximum));
        assert_eq!(store.speed(), MAX_SPEED);
    }

    #[test]
    fn test_decrement_stops_at_min() {
        let mut store = ConfigStore::morse();
        let mut expected = INIT_SPEED;
        while store.decrement_speed().is_ok() {
            expected -= 1;
            assert_eq!(store.speed(), expected);
        }
        assert_eq!(store.speed(), MIN_SPEED);
        assert_eq!(store.decrement_speed(), Err(SpeedError::BelowMinimum));
        assert_eq!(store.speed(), MIN_SPEED);
    }

    #[test]
    fn test_speed_handle_follows_store() {
        let mut store = ConfigStore::morse();
        let handle = store.speed_handle();
        store.set_speed(32).unwrap();
        assert_eq!(handle.speed(), 32);
    }

    #[test]
    fn test_message_slot_range() {
        let store = ConfigStore::morse();
        for slot in [0, 5, 9] {
            assert_eq!(store.message(slot), Ok(""));
        }
        for slot in [-1, 10, 42] {
            assert_eq!(store.message(slot), Err(SlotError::OutOfRange));
        }
    }

    #[test]
    fn test_set_message_trims_and_uppercases() {
        let mut store = ConfigStore::morse();
        store.set_message(4, " cq cq k3gds ").unwrap();
        assert_eq!(store.message(4), Ok("CQ CQ K3GDS"));

        store.set_message(4, " newmessage").unwrap();
        assert_eq!(store.message(4), Ok("NEWMESSAGE"));
    }

    #[test]
    fn test_set_message_rejects_whole_message() {
        let mut store = ConfigStore::morse();
        store.set_message(2, "5NN TU").unwrap();

        let err = store.set_message(2, "hello $world").unwrap_err();
        assert_eq!(err, MessageError::UnsendableCharacter('$'));
        assert_eq!(err.to_string(), "message contains unsupported rune $");
        assert_eq!(store.message(2), Ok("5NN TU"));
    }

    #[test]
    fn test_set_message_out_of_range() {
        let mut store = ConfigStore::morse();
        assert_eq!(store.set_message(-1, "x"), Err(MessageError::OutOfRange));
        assert_eq!(store.set_message(10, "x"), Err(MessageError::OutOfRange));
    }

    #[test]
    fn test_describe_lists_slot_zero_last() {
        let mut store = ConfigStore::morse();
        store.set_message(0, "zero").unwrap();
        store.set_message(1, "one").unwrap();

        let report = store.describe();
        assert!(report.contains("Speed: 18 WPM"));
        let one = report.find("    1: ONE").unwrap();
        let nine = report.find("    9: ").unwrap();
        let zero = report.find("    0: ZERO").unwrap();
        assert!(one < nine && nine < zero);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SpeedError::BelowMinimum.to_string(),
            "new speed is below minimum of 5"
        );
        assert_eq!(
            SpeedError::AboveMaximum.to_string(),
            "new speed is above maximum of 50"
        );
        assert_eq!(SlotError::OutOfRange.to_string(), "message number out of range");
    }
}
