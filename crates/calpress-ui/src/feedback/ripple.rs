//! Press ripple.
//!
//! Expands over [`RIPPLE_EXPAND_MS`] to cover the whole surface. A release
//! after full expansion fades it out in place. A release mid-expansion lets
//! it keep growing for a grace period that shrinks with progress, then fades
//! it while it continues to grow more slowly.

use super::effect::{EffectDescriptor, EffectFrame, EffectId, EffectKind, EffectNode};
use crate::surface::{Surface, SurfaceError};
use calpress_animation::{AnimationSpec, Easing};
use calpress_core::{RuntimeHandle, TimerRegistration};
use calpress_ui_graphics::{Color, Point};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const RIPPLE_EXPAND_MS: u64 = 400;
pub const RIPPLE_FADE_MS: u64 = 200;
pub const RIPPLE_INTERRUPTED_FADE_MS: u64 = 250;
pub const MAX_GRACE_MS: u64 = 300;
pub const MIN_GRACE_MS: u64 = 30;
/// Diameter relative to the larger surface dimension.
pub const RIPPLE_COVERAGE: f32 = 2.5;

const RIPPLE_START_SCALE: f32 = 0.01;
const RIPPLE_OPACITY: f32 = 0.2;
const INTERRUPTED_GROWTH: f32 = 0.3;
const INTERRUPTED_MAX_SCALE: f32 = 1.2;

/// Delay between an interrupted ripple's release and the start of its fade.
///
/// Non-increasing in `progress` and always within
/// `[MIN_GRACE_MS, MAX_GRACE_MS]`.
pub fn grace_period(progress: f32) -> u64 {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let grace = MAX_GRACE_MS as f32 * (1.0 - progress) + MIN_GRACE_MS as f32;
    (grace.round() as u64).clamp(MIN_GRACE_MS, MAX_GRACE_MS)
}

/// Scale an interrupted ripple grows toward while it fades.
fn interrupted_target(current: f32) -> f32 {
    (current + INTERRUPTED_GROWTH).min(INTERRUPTED_MAX_SCALE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RipplePhase {
    Expanding,
    /// Released mid-expansion, waiting out the grace period.
    Grace,
    FadingOut,
    Removed,
}

pub struct RippleEffect {
    node: Rc<EffectNode>,
    origin: Point,
    max_radius: f32,
    created_at: u64,
    phase: Cell<RipplePhase>,
    grace_timer: RefCell<Option<TimerRegistration>>,
}

impl RippleEffect {
    /// Mounts a ripple centered on `origin` and starts the expansion.
    pub fn start(
        surface: Rc<dyn Surface>,
        runtime: RuntimeHandle,
        id: EffectId,
        origin: Point,
        color: Color,
    ) -> Result<Rc<Self>, SurfaceError> {
        let diameter = surface.size().max_dimension() * RIPPLE_COVERAGE;
        let descriptor = EffectDescriptor::new(EffectKind::Ripple, origin, diameter, color);
        let created_at = runtime.now_millis();
        let node = EffectNode::mount(
            surface,
            runtime,
            id,
            descriptor,
            EffectFrame::new(RIPPLE_START_SCALE, RIPPLE_OPACITY),
        )?;
        node.animate_scale(
            1.0,
            AnimationSpec::tween(RIPPLE_EXPAND_MS, Easing::FastOutSlowInEasing),
        );
        Ok(Rc::new(Self {
            node,
            origin,
            max_radius: diameter / 2.0,
            created_at,
            phase: Cell::new(RipplePhase::Expanding),
            grace_timer: RefCell::new(None),
        }))
    }

    pub fn id(&self) -> EffectId {
        self.node.id()
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn descriptor(&self) -> EffectDescriptor {
        *self.node.descriptor()
    }

    pub fn phase(&self) -> RipplePhase {
        if !self.node.is_mounted() {
            return RipplePhase::Removed;
        }
        self.phase.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.node.is_mounted()
    }

    /// Expansion progress in `[0, 1]` at `now_millis`.
    pub fn progress(&self, now_millis: u64) -> f32 {
        let elapsed = now_millis.saturating_sub(self.created_at);
        (elapsed as f32 / RIPPLE_EXPAND_MS as f32).min(1.0)
    }

    pub fn expansion_complete(&self, now_millis: u64) -> bool {
        now_millis.saturating_sub(self.created_at) >= RIPPLE_EXPAND_MS
    }

    pub fn frame_at(&self, time_millis: u64) -> EffectFrame {
        self.node.frame_at(time_millis)
    }

    /// Starts the fade-out. Only the first call has an effect.
    pub fn release(self: &Rc<Self>) {
        if self.phase() != RipplePhase::Expanding {
            return;
        }
        let now = self.node.now_millis();
        if self.expansion_complete(now) {
            self.phase.set(RipplePhase::FadingOut);
            self.node
                .animate_opacity(0.0, AnimationSpec::linear(RIPPLE_FADE_MS));
            self.node.unmount_after(RIPPLE_FADE_MS, || {});
            return;
        }

        let grace = grace_period(self.progress(now));
        self.phase.set(RipplePhase::Grace);
        let weak = Rc::downgrade(self);
        let timer = TimerRegistration::schedule(self.node.runtime(), grace, move || {
            if let Some(ripple) = weak.upgrade() {
                ripple.begin_interrupted_fade();
            }
        });
        *self.grace_timer.borrow_mut() = Some(timer);
    }

    fn begin_interrupted_fade(self: &Rc<Self>) {
        self.grace_timer.borrow_mut().take();
        if self.phase() != RipplePhase::Grace {
            return;
        }
        self.phase.set(RipplePhase::FadingOut);
        let current = self.node.frame_at(self.node.now_millis()).scale;
        self.node.animate_scale(
            interrupted_target(current),
            AnimationSpec::tween(RIPPLE_INTERRUPTED_FADE_MS, Easing::LinearOutSlowInEasing),
        );
        self.node
            .animate_opacity(0.0, AnimationSpec::linear(RIPPLE_INTERRUPTED_FADE_MS));
        self.node.unmount_after(RIPPLE_INTERRUPTED_FADE_MS, || {});
    }

    /// Unmounts immediately, skipping any fade.
    pub fn remove_now(&self) {
        self.grace_timer.borrow_mut().take();
        self.phase.set(RipplePhase::Removed);
        self.node.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grace_is_bounded_and_non_increasing() {
        let mut previous = u64::MAX;
        for step in 0..=100 {
            let progress = step as f32 / 100.0;
            let grace = grace_period(progress);
            assert!((MIN_GRACE_MS..=MAX_GRACE_MS).contains(&grace), "{grace}");
            assert!(grace <= previous, "grace grew at progress {progress}");
            previous = grace;
        }
    }

    #[test]
    fn grace_endpoints() {
        assert_eq!(grace_period(0.0), MAX_GRACE_MS);
        assert_eq!(grace_period(1.0), MIN_GRACE_MS);
        assert_eq!(grace_period(0.5), 180);
        assert_eq!(grace_period(-3.0), MAX_GRACE_MS);
        assert_eq!(grace_period(7.0), MIN_GRACE_MS);
        assert_eq!(grace_period(f32::NAN), MAX_GRACE_MS);
    }

    #[test]
    fn interrupted_fade_keeps_growing() {
        for current in [0.01_f32, 0.4, 0.95, 1.0] {
            assert!(interrupted_target(current) > current);
        }
    }
}
