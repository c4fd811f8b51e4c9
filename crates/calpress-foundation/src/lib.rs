//! Pointer input and gesture recognition for calpress
//!
//! The [`gestures::HoldTapDetector`] is the pure tap/hold state machine. The
//! [`gestures::HoldTapRecognizer`] wraps it with a session timer and reports
//! transitions to a [`gestures::GestureHandler`].

pub mod gesture_constants;
pub mod gestures;
pub mod input;
pub mod orphan_registry;

pub use gestures::{
    GestureHandler, GestureResolution, GestureSession, HoldTapConfig, HoldTapDetector,
    HoldTapRecognizer, ResolutionCause, SessionId,
};
pub use input::{
    PointerButton, PointerButtons, PointerDispatcher, PointerEvent, PointerEventKind, PointerId,
    PointerKind,
};
pub use orphan_registry::{OrphanKey, OrphanRegistry, OrphanedEffect};

pub mod prelude {
    pub use crate::gestures::{GestureResolution, HoldTapConfig, HoldTapRecognizer};
    pub use crate::input::{PointerEvent, PointerEventKind, PointerKind};
    pub use crate::orphan_registry::OrphanRegistry;
}
