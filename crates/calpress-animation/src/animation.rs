//! Time-based animations with easing curves.

use std::cell::RefCell;
use std::rc::Rc;

use calpress_core::{FrameCallbackRegistration, RuntimeHandle};

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

/// Easing curves. The material curves match the CSS timing functions web
/// hosts use for the same effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    LinearEasing,
    /// Material standard curve, `cubic-bezier(0.4, 0, 0.2, 1)`.
    FastOutSlowInEasing,
    /// `cubic-bezier(0, 0, 0.2, 1)`; used for decelerating continuations.
    LinearOutSlowInEasing,
    FastOutLinearEasing,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction.clamp(0.0, 1.0),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowInEasing => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearEasing => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve approximation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric `t` matching the x fraction.
    let mut t = fraction;
    let mut newton_success = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            newton_success = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !newton_success {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let x = sample_curve(ax, bx, cx, t);
            let delta = x - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Animation specification combining duration and easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }

    /// Total time from start to settled.
    pub fn total_millis(&self) -> u64 {
        self.duration_millis
    }

    /// Linear (un-eased) progress after `elapsed_millis`, in [0, 1].
    pub fn linear_progress(&self, elapsed_millis: u64) -> f32 {
        let duration = self.duration_millis.max(1);
        (elapsed_millis as f32 / duration as f32).clamp(0.0, 1.0)
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowInEasing)
    }
}

/// Animatable value holder driven by the runtime's frame clock.
pub struct Animatable<T: Lerp + Clone + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: Lerp + Clone + 'static> {
    runtime: RuntimeHandle,
    current: T,
    start: T,
    target: T,
    spec: AnimationSpec,
    start_time_millis: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
}

impl<T: Lerp + Clone + 'static> AnimatableInner<T> {
    fn sample(&self, time_millis: u64) -> T {
        match self.start_time_millis {
            None => self.current.clone(),
            Some(start_time) => {
                let elapsed = time_millis.saturating_sub(start_time);
                let progress = self.spec.easing.transform(self.spec.linear_progress(elapsed));
                self.start.lerp(&self.target, progress)
            }
        }
    }

    fn is_settled_at(&self, time_millis: u64) -> bool {
        match self.start_time_millis {
            None => true,
            Some(start_time) => time_millis.saturating_sub(start_time) >= self.spec.total_millis(),
        }
    }
}

impl<T: Lerp + Clone + 'static> Animatable<T> {
    /// Create a new animatable with the given initial value.
    pub fn new(initial: T, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            runtime,
            current: initial.clone(),
            start: initial.clone(),
            target: initial,
            spec: AnimationSpec::default(),
            start_time_millis: None,
            registration: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Animate from the value at the current instant toward `target`.
    ///
    /// Retargeting mid-flight starts from wherever the running animation is
    /// at this moment, so there is never a jump.
    pub fn animate_to(&self, target: T, spec: AnimationSpec) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            let now = inner.runtime.now_millis();
            let from = inner.sample(now);
            inner.current = from.clone();
            inner.start = from;
            inner.target = target;
            inner.spec = spec;
            inner.start_time_millis = Some(now);
        }
        Self::schedule_frame(&self.inner);
    }

    /// Snap immediately to the target value without animating.
    pub fn snap_to(&self, target: T) {
        let mut inner = self.inner.borrow_mut();
        if let Some(registration) = inner.registration.take() {
            registration.cancel();
        }
        inner.current = target.clone();
        inner.start = target.clone();
        inner.target = target;
        inner.start_time_millis = None;
    }

    /// Freeze at the value of the current instant.
    pub fn stop(&self) {
        let now = self.inner.borrow().runtime.now_millis();
        let value = self.value_at(now);
        self.snap_to(value);
    }

    /// Value as of the last frame.
    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    /// Value the animation has at `time_millis`, independent of frames.
    pub fn value_at(&self, time_millis: u64) -> T {
        self.inner.borrow().sample(time_millis)
    }

    pub fn target(&self) -> T {
        self.inner.borrow().target.clone()
    }

    pub fn spec(&self) -> AnimationSpec {
        self.inner.borrow().spec
    }

    pub fn is_running(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.is_settled_at(inner.runtime.now_millis())
    }

    /// Time at which the running animation settles.
    pub fn end_time_millis(&self) -> Option<u64> {
        let inner = self.inner.borrow();
        inner
            .start_time_millis
            .map(|start| start + inner.spec.total_millis())
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let clock = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            inner.runtime.frame_clock()
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_millis(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_millis: u64) {
        let schedule_next = {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            if inner.is_settled_at(frame_time_millis) {
                inner.current = inner.target.clone();
                inner.start = inner.target.clone();
                inner.start_time_millis = None;
                false
            } else {
                inner.current = inner.sample(frame_time_millis);
                true
            }
        };

        if schedule_next {
            Self::schedule_frame(this);
        }
    }
}

impl<T: Lerp + Clone + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
