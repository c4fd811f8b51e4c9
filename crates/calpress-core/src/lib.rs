//! Core runtime for calpress
//!
//! Everything in the gesture engine runs on one logical thread. The
//! [`Runtime`] owns a virtual clock, a queue of one-shot timers and a queue
//! of frame callbacks. Hosts advance it from their event loop (or from a
//! test) and it fires whatever became due, in deadline order.

mod clock;
mod frame_clock;
mod runtime;
mod timer;

pub use clock::SystemClock;
pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use runtime::{Runtime, RuntimeHandle, FRAME_INTERVAL_MS};
pub use timer::{SessionTimer, TimerHandle, TimerRegistration};

pub type TimerId = u64;
pub type FrameCallbackId = u64;

pub mod prelude {
    pub use crate::frame_clock::{FrameCallbackRegistration, FrameClock};
    pub use crate::runtime::{Runtime, RuntimeHandle};
    pub use crate::timer::{SessionTimer, TimerHandle, TimerRegistration};
}
