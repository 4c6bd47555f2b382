//! Transmission queue coordination.
//!
//! The UI thread appends ([`SendQueue::enqueue`]) or clears
//! ([`SendQueue::drain_now`]); the background loop started by
//! [`spawn_send_loop`] pops the head and hands it to the engine.
//!
//! ## Cancellation
//!
//! Each popped message is paired with the queue's current
//! [`CancellationToken`]. A drain cancels that token and installs a fresh one,
//! so the in-flight send aborts while anything enqueued afterwards is sent
//! normally.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::display::{EventSink, Level};
use crate::engine::{Alphabet, EngineError, TransmissionEngine};
use crate::morse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("message contains unsupported rune {0}")]
    UnsendableCharacter(char),
}

struct QueueState {
    pending: VecDeque<String>,
    abort: CancellationToken,
}

struct Shared {
    alphabet: Arc<dyn Alphabet>,
    state: Mutex<QueueState>,
    wakeup: Notify,
}

/// Handle to the shared transmission queue. Cheap to clone.
#[derive(Clone)]
pub struct SendQueue {
    shared: Arc<Shared>,
}

impl SendQueue {
    pub fn new(alphabet: Arc<dyn Alphabet>) -> Self {
        Self {
            shared: Arc::new(Shared {
                alphabet,
                state: Mutex::new(QueueState {
                    pending: VecDeque::new(),
                    abort: CancellationToken::new(),
                }),
                wakeup: Notify::new(),
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a message after checking every character is keyable.
    ///
    /// # Errors
    /// Returns the first unsendable rune; nothing is queued in that case.
    pub fn enqueue(&self, message: impl Into<String>) -> Result<(), SendError> {
        let message = message.into();
        if let Some(c) = morse::first_unkeyable(self.shared.alphabet.as_ref(), &message) {
            return Err(SendError::UnsendableCharacter(c));
        }
        tracing::debug!(len = message.len(), "enqueue message");
        self.lock_state().pending.push_back(message);
        self.shared.wakeup.notify_one();
        Ok(())
    }

    /// Discards pending messages and aborts the one being sent.
    pub fn drain_now(&self) {
        let mut state = self.lock_state();
        let dropped = state.pending.len();
        state.pending.clear();
        state.abort.cancel();
        state.abort = CancellationToken::new();
        drop(state);
        tracing::info!(dropped, "drained send queue");
    }

    pub fn is_empty(&self) -> bool {
        self.lock_state().pending.is_empty()
    }

    /// Number of messages waiting (not counting one in flight).
    pub fn len(&self) -> usize {
        self.lock_state().pending.len()
    }

    /// Waits for the next message and the token that aborts it.
    pub async fn next(&self) -> (String, CancellationToken) {
        loop {
            {
                let mut state = self.lock_state();
                if let Some(message) = state.pending.pop_front() {
                    return (message, state.abort.clone());
                }
            }
            self.shared.wakeup.notified().await;
        }
    }
}

/// Runs the send loop forever, reporting engine failures to `sink`.
///
/// A failed message is dropped; the loop moves on to the next one.
pub async fn run_send_loop<E, S>(queue: SendQueue, engine: E, sink: S)
where
    E: TransmissionEngine,
    S: EventSink,
{
    loop {
        let (message, abort) = queue.next().await;
        tracing::debug!(engine = engine.name(), %message, "sending");
        match engine.send(&message, &abort).await {
            Ok(()) => {}
            Err(EngineError::Aborted) => {
                tracing::debug!("send aborted by drain");
            }
            Err(err) => {
                tracing::warn!(error = %err, "send failed");
                sink.report(Level::Error, err.to_string());
            }
        }
    }
}

/// Spawns [`run_send_loop`] on the current tokio runtime.
pub fn spawn_send_loop<E, S>(queue: SendQueue, engine: E, sink: S) -> JoinHandle<()>
where
    E: TransmissionEngine + Send + Sync,
    S: EventSink,
{
    tokio::spawn(run_send_loop(queue, engine, sink))
}
