//! Surface interaction for calpress cards
//!
//! [`setup`] connects a [`Surface`] to the tap/hold recognizer, the visual
//! [`feedback`] layer and the action dispatcher, and returns the
//! [`InteractionHandle`] used to observe and tear it down.

pub mod feedback;
mod interaction;
mod surface;

pub use feedback::{
    EffectDescriptor, EffectFrame, EffectId, EffectKind, FeedbackController, FeedbackStyle,
};
pub use interaction::{setup, GestureResolved, InteractionContext, InteractionHandle};
pub use surface::{ListenerId, PointerListener, Surface, SurfaceError};

pub mod prelude {
    pub use crate::interaction::{setup, GestureResolved, InteractionContext, InteractionHandle};
    pub use crate::surface::Surface;
    pub use calpress_actions::CardActionsConfig;
    pub use calpress_foundation::{GestureResolution, OrphanRegistry, PointerEvent, PointerKind};
}

#[cfg(test)]
#[path = "tests/feedback_tests.rs"]
mod feedback_tests;
