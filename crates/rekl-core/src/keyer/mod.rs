//! Morse keyer: turns text into timed key-down/key-up transitions.
//!
//! - `serial.rs`: DTR line on a serial port (unix)
//! - `beep.rs`: audio sidetone on the default output device (feature `beep`)

#[cfg(feature = "beep")]
mod beep;
mod serial;

use std::io;
use std::time::Duration;

#[cfg(feature = "beep")]
pub use beep::BeepKey;
pub use serial::SerialDtrKey;
use tokio_util::sync::CancellationToken;

use crate::engine::{Alphabet, EngineError, SpeedProvider, TransmissionEngine};
use crate::morse::{self, CHAR_GAP_UNITS, DAH_UNITS, DIT_UNITS, ELEMENT_GAP_UNITS, WORD_GAP_UNITS};

/// A physical or virtual straight key.
pub trait Key: Send + Sync + 'static {
    /// Short name shown in the status line.
    fn name(&self) -> &'static str;

    /// Closes the key.
    ///
    /// # Errors
    /// Returns an error if the device rejects the change.
    fn down(&self) -> io::Result<()>;

    /// Opens the key.
    ///
    /// # Errors
    /// Returns an error if the device rejects the change.
    fn up(&self) -> io::Result<()>;
}

impl<K: Key + ?Sized> Key for Box<K> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn down(&self) -> io::Result<()> {
        (**self).down()
    }

    fn up(&self) -> io::Result<()> {
        (**self).up()
    }
}

/// Transmission engine that keys Morse with PARIS timing.
pub struct Keyer<K, S> {
    key: K,
    speed: S,
}

impl<K: Key, S: SpeedProvider> Keyer<K, S> {
    pub fn new(key: K, speed: S) -> Self {
        Self { key, speed }
    }

    async fn key_element(
        &self,
        units: u32,
        unit: Duration,
        abort: &CancellationToken,
    ) -> Result<(), EngineError> {
        self.key.down()?;
        let waited = wait(unit * units, abort).await;
        // Always release, even when aborted mid-element.
        self.key.up()?;
        waited
    }

    async fn send_char(
        &self,
        code: &str,
        unit: Duration,
        abort: &CancellationToken,
    ) -> Result<(), EngineError> {
        for (i, element) in code.chars().enumerate() {
            if i > 0 {
                wait(unit * ELEMENT_GAP_UNITS, abort).await?;
            }
            let units = if element == '-' { DAH_UNITS } else { DIT_UNITS };
            self.key_element(units, unit, abort).await?;
        }
        Ok(())
    }
}

async fn wait(duration: Duration, abort: &CancellationToken) -> Result<(), EngineError> {
    tokio::select! {
        () = abort.cancelled() => Err(EngineError::Aborted),
        () = tokio::time::sleep(duration) => Ok(()),
    }
}

impl<K: Key, S: SpeedProvider> Alphabet for Keyer<K, S> {
    fn is_keyable(&self, c: char) -> bool {
        morse::is_keyable(c)
    }
}

impl<K, S> TransmissionEngine for Keyer<K, S>
where
    K: Key,
    S: SpeedProvider + 'static,
{
    fn name(&self) -> &'static str {
        self.key.name()
    }

    async fn send(&self, message: &str, abort: &CancellationToken) -> Result<(), EngineError> {
        if abort.is_cancelled() {
            return Err(EngineError::Aborted);
        }
        // Gap owed before the next keyed character; trailing gaps are not waited.
        let mut gap_units = 0;
        for c in message.chars() {
            if c == ' ' {
                gap_units = WORD_GAP_UNITS;
                continue;
            }
            let code = morse::code_for(c).ok_or(EngineError::Unkeyable(c))?;
            // Re-read per character so speed changes apply mid-message.
            let unit = morse::unit_duration(self.speed.speed());
            if gap_units > 0 {
                wait(unit * gap_units, abort).await?;
            }
            self.send_char(code, unit, abort).await?;
            gap_units = CHAR_GAP_UNITS;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::time::Instant;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Transition {
        Down,
        Up,
    }

    /// Records transitions with the (paused) tokio clock.
    #[derive(Clone)]
    struct RecordingKey {
        start: Instant,
        log: Arc<Mutex<Vec<(Transition, Duration)>>>,
    }

    impl RecordingKey {
        fn new() -> Self {
            Self {
                start: Instant::now(),
                log: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn record(&self, transition: Transition) {
            let at = self.start.elapsed();
            self.log.lock().unwrap().push((transition, at));
        }

        fn transitions(&self) -> Vec<(Transition, Duration)> {
            self.log.lock().unwrap().clone()
        }
    }

    impl Key for RecordingKey {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn down(&self) -> io::Result<()> {
            self.record(Transition::Down);
            Ok(())
        }

        fn up(&self) -> io::Result<()> {
            self.record(Transition::Up);
            Ok(())
        }
    }

    struct FixedSpeed(i32);

    impl SpeedProvider for FixedSpeed {
        fn speed(&self) -> i32 {
            self.0
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_dit_at_20_wpm() {
        let key = RecordingKey::new();
        let keyer = Keyer::new(key.clone(), FixedSpeed(20));

        keyer.send("E", &CancellationToken::new()).await.unwrap();

        assert_eq!(
            key.transitions(),
            vec![(Transition::Down, ms(0)), (Transition::Up, ms(60))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_element_and_character_gaps() {
        let key = RecordingKey::new();
        let keyer = Keyer::new(key.clone(), FixedSpeed(20));

        // A = .-   then character gap, then T = -
        keyer.send("AT", &CancellationToken::new()).await.unwrap();

        assert_eq!(
            key.transitions(),
            vec![
                (Transition::Down, ms(0)),
                (Transition::Up, ms(60)),
                (Transition::Down, ms(120)),
                (Transition::Up, ms(300)),
                (Transition::Down, ms(480)),
                (Transition::Up, ms(660)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_word_gap_is_seven_units() {
        let key = RecordingKey::new();
        let keyer = Keyer::new(key.clone(), FixedSpeed(20));

        keyer.send("E E", &CancellationToken::new()).await.unwrap();

        let transitions = key.transitions();
        assert_eq!(transitions[1], (Transition::Up, ms(60)));
        assert_eq!(transitions[2], (Transition::Down, ms(60 + 7 * 60)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_releases_key() {
        let key = RecordingKey::new();
        let keyer = Keyer::new(key.clone(), FixedSpeed(5));
        let abort = CancellationToken::new();

        let canceller = abort.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ms(100)).await;
            canceller.cancel();
        });

        let result = keyer.send("TTTT", &abort).await;
        assert!(matches!(result, Err(EngineError::Aborted)));
        assert_eq!(
            key.transitions(),
            vec![(Transition::Down, ms(0)), (Transition::Up, ms(100))]
        );
    }

    #[tokio::test]
    async fn test_already_aborted_sends_nothing() {
        let key = RecordingKey::new();
        let keyer = Keyer::new(key.clone(), FixedSpeed(20));
        let abort = CancellationToken::new();
        abort.cancel();

        assert!(matches!(
            keyer.send("CQ", &abort).await,
            Err(EngineError::Aborted)
        ));
        assert!(key.transitions().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_rune_is_an_error() {
        let keyer = Keyer::new(RecordingKey::new(), FixedSpeed(50));
        assert!(matches!(
            keyer.send("@", &CancellationToken::new()).await,
            Err(EngineError::Unkeyable('@'))
        ));
    }
}
