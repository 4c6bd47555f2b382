//! Core REKL library (configuration store, input dispatch, send queue, keyer).
//!
//! The terminal front end lives in `rekl-tui`; everything here is independent of
//! how events are rendered or how keys are read from the terminal.

pub mod config;
pub mod dispatch;
pub mod display;
pub mod engine;
pub mod help;
pub mod keyer;
pub mod morse;
pub mod queue;
pub mod store;

pub use dispatch::{Dispatcher, Disposition, KeyInput};
pub use display::{DisplaySurface, EventSink, Level, ReportedEvent};
pub use engine::{Alphabet, EngineError, SpeedProvider, TransmissionEngine};
pub use queue::{SendError, SendQueue, spawn_send_loop};
pub use store::{ConfigStore, MessageError, SlotError, SpeedError, SpeedHandle};
