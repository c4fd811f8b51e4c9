//! Shared gesture constants for tap/hold handling.
//!
//! Values are in logical pixels and milliseconds.

/// Time a stationary press must last before it can resolve as a hold.
pub const HOLD_THRESHOLD_MS: u64 = 500;

/// Displacement from the press origin beyond which the gesture is voided.
///
/// Past this distance neither tap nor hold fires on release; the user is
/// scrolling or dragging, not pressing.
pub const MOVE_THRESHOLD: f32 = 10.0;

/// Accepted range for a configured movement threshold.
pub const MOVE_THRESHOLD_RANGE: (f32, f32) = (10.0, 16.0);
