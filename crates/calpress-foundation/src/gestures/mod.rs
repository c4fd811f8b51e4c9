pub mod hold_tap;
pub mod recognizer;

pub use hold_tap::{
    DetectorOutput, GesturePhase, GestureResolution, GestureSession, HoldTapConfig,
    HoldTapDetector, ResolutionCause, SessionId,
};
pub use recognizer::{GestureHandler, HoldTapRecognizer};
