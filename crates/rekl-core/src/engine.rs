//! Transmission engine seam.
//!
//! The send queue and configuration store only know about these traits; the
//! concrete keyer in [`crate::keyer`] is one implementation.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Defines which characters can be sent.
pub trait Alphabet: Send + Sync {
    fn is_keyable(&self, c: char) -> bool;
}

/// Supplies the current sending speed in WPM.
pub trait SpeedProvider: Send + Sync {
    fn speed(&self) -> i32;
}

/// Errors reported by a transmission engine while sending.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The send was cancelled by a drain.
    #[error("transmission aborted")]
    Aborted,

    /// The engine was asked to send a character it has no code for.
    #[error("engine cannot send rune {0}")]
    Unkeyable(char),

    /// The physical key failed.
    #[error("key error: {0}")]
    Key(#[from] std::io::Error),
}

/// Something that can transmit messages.
pub trait TransmissionEngine: Alphabet + 'static {
    /// Short name shown in the status line.
    fn name(&self) -> &'static str;

    /// Transmits one message at the engine's current speed.
    ///
    /// Must return promptly with [`EngineError::Aborted`] once `abort` is cancelled.
    fn send(
        &self,
        message: &str,
        abort: &CancellationToken,
    ) -> impl Future<Output = Result<(), EngineError>> + Send;
}
