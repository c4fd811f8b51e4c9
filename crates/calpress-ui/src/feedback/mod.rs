//! Visual feedback for presses: ripples and hold indicators.

mod effect;
mod hold_indicator;
mod ripple;

pub use effect::{EffectDescriptor, EffectFrame, EffectId, EffectKind};
pub use hold_indicator::{
    HoldIndicator, HOLD_INDICATOR_FADE_MS, HOLD_INDICATOR_OPACITY, HOLD_INDICATOR_SHOW_MS,
};
pub use ripple::{
    grace_period, RippleEffect, RipplePhase, MAX_GRACE_MS, MIN_GRACE_MS, RIPPLE_COVERAGE,
    RIPPLE_EXPAND_MS, RIPPLE_FADE_MS, RIPPLE_INTERRUPTED_FADE_MS,
};

use crate::surface::Surface;
use calpress_core::RuntimeHandle;
use calpress_foundation::{OrphanRegistry, PointerKind};
use calpress_ui_graphics::{Color, Point};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedbackStyle {
    pub ripple_color: Color,
    pub indicator_color: Color,
    pub coarse_indicator_size: f32,
    pub fine_indicator_size: f32,
}

impl Default for FeedbackStyle {
    fn default() -> Self {
        Self {
            ripple_color: Color::WHITE,
            indicator_color: Color::from_rgb_u8(3, 169, 244),
            coarse_indicator_size: 80.0,
            fine_indicator_size: 50.0,
        }
    }
}

impl FeedbackStyle {
    pub fn indicator_size(&self, pointer_kind: PointerKind) -> f32 {
        if pointer_kind.is_coarse() {
            self.coarse_indicator_size
        } else {
            self.fine_indicator_size
        }
    }
}

#[derive(Clone)]
enum LiveEffect {
    Ripple(Rc<RippleEffect>),
    Indicator(Rc<HoldIndicator>),
}

impl LiveEffect {
    fn is_mounted(&self) -> bool {
        match self {
            LiveEffect::Ripple(ripple) => ripple.is_mounted(),
            LiveEffect::Indicator(indicator) => indicator.is_mounted(),
        }
    }

    fn remove_now(&self) {
        match self {
            LiveEffect::Ripple(ripple) => ripple.remove_now(),
            LiveEffect::Indicator(indicator) => indicator.purge_now(),
        }
    }
}

#[derive(Default)]
struct FeedbackState {
    ripple: Option<Rc<RippleEffect>>,
    indicator: Option<Rc<HoldIndicator>>,
    /// Released effects that are still fading out.
    retiring: SmallVec<[LiveEffect; 4]>,
}

impl FeedbackState {
    fn retire(&mut self, effect: LiveEffect) {
        self.retiring.retain(|live| live.is_mounted());
        self.retiring.push(effect);
    }
}

/// Owns the ripple and hold indicator of one surface.
pub struct FeedbackController {
    runtime: RuntimeHandle,
    surface: Rc<dyn Surface>,
    registry: Rc<OrphanRegistry>,
    style: FeedbackStyle,
    next_id: Cell<EffectId>,
    state: RefCell<FeedbackState>,
}

impl FeedbackController {
    pub fn new(
        runtime: RuntimeHandle,
        surface: Rc<dyn Surface>,
        registry: Rc<OrphanRegistry>,
        style: FeedbackStyle,
    ) -> Self {
        Self {
            runtime,
            surface,
            registry,
            style,
            next_id: Cell::new(1),
            state: RefCell::new(FeedbackState::default()),
        }
    }

    pub fn style(&self) -> &FeedbackStyle {
        &self.style
    }

    /// Starts a ripple at `origin`, releasing any ripple still expanding.
    pub fn press(&self, origin: Point) {
        let previous = self.state.borrow_mut().ripple.take();
        if let Some(previous) = previous {
            previous.release();
            self.state.borrow_mut().retire(LiveEffect::Ripple(previous));
        }
        match RippleEffect::start(
            self.surface.clone(),
            self.runtime.clone(),
            self.allocate_id(),
            origin,
            self.style.ripple_color,
        ) {
            Ok(ripple) => self.state.borrow_mut().ripple = Some(ripple),
            Err(err) => log::warn!("ripple not shown: {err}"),
        }
    }

    pub fn show_hold_indicator(&self, position: Point, pointer_kind: PointerKind) {
        let previous = self.state.borrow_mut().indicator.take();
        if let Some(previous) = previous {
            previous.remove();
            self.state
                .borrow_mut()
                .retire(LiveEffect::Indicator(previous));
        }
        match HoldIndicator::show(
            self.surface.clone(),
            self.runtime.clone(),
            &self.registry,
            self.allocate_id(),
            position,
            self.style.indicator_size(pointer_kind),
            self.style.indicator_color,
        ) {
            Ok(indicator) => self.state.borrow_mut().indicator = Some(indicator),
            Err(err) => log::warn!("hold indicator not shown: {err}"),
        }
    }

    /// Fades out the ripple and hold indicator of the finished gesture.
    pub fn release(&self) {
        let (ripple, indicator) = {
            let mut state = self.state.borrow_mut();
            (state.ripple.take(), state.indicator.take())
        };
        if let Some(ripple) = ripple {
            ripple.release();
            self.state.borrow_mut().retire(LiveEffect::Ripple(ripple));
        }
        if let Some(indicator) = indicator {
            indicator.remove();
            self.state
                .borrow_mut()
                .retire(LiveEffect::Indicator(indicator));
        }
    }

    /// Removes every effect immediately, including ones still fading.
    pub fn clear(&self) {
        let effects: SmallVec<[LiveEffect; 6]> = {
            let mut state = self.state.borrow_mut();
            let mut effects: SmallVec<[LiveEffect; 6]> = state.retiring.drain(..).collect();
            effects.extend(state.ripple.take().map(LiveEffect::Ripple));
            effects.extend(state.indicator.take().map(LiveEffect::Indicator));
            effects
        };
        for effect in effects {
            effect.remove_now();
        }
    }

    pub fn ripple(&self) -> Option<Rc<RippleEffect>> {
        self.state.borrow().ripple.clone()
    }

    pub fn hold_indicator(&self) -> Option<Rc<HoldIndicator>> {
        self.state.borrow().indicator.clone()
    }

    /// True while an indicator for the current gesture is on screen.
    pub fn has_hold_indicator(&self) -> bool {
        self.state
            .borrow()
            .indicator
            .as_ref()
            .is_some_and(|indicator| indicator.is_mounted() && !indicator.is_removing())
    }

    /// Effects still mounted on the surface, fading ones included.
    pub fn live_effect_count(&self) -> usize {
        let mut state = self.state.borrow_mut();
        state.retiring.retain(|live| live.is_mounted());
        let current = state.ripple.iter().filter(|ripple| ripple.is_mounted()).count()
            + state
                .indicator
                .iter()
                .filter(|indicator| indicator.is_mounted())
                .count();
        current + state.retiring.len()
    }

    fn allocate_id(&self) -> EffectId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl Drop for FeedbackController {
    fn drop(&mut self) {
        self.clear();
    }
}
