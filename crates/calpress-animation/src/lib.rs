//! Animation system for calpress
//!
//! Tweens driven by the runtime's frame clock. Values are also available as a
//! pure function of time through [`Animatable::value_at`], which is what the
//! renderer-agnostic frame pass samples.

mod animation;

pub use animation::*;
