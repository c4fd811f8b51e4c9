//! Renderer-agnostic effect descriptors and the node that animates them.

use crate::surface::{Surface, SurfaceError};
use calpress_animation::{Animatable, AnimationSpec};
use calpress_core::{FrameCallbackRegistration, RuntimeHandle, TimerRegistration};
use calpress_ui_graphics::{Color, Point, Rect};
use std::cell::RefCell;
use std::rc::Rc;

pub type EffectId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Ripple,
    HoldIndicator,
}

/// What the renderer draws: a filled circle layered above the surface
/// background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    /// Center in surface coordinates.
    pub center: Point,
    /// Diameter at scale 1.
    pub diameter: f32,
    pub color: Color,
    /// Always false; effects never take pointer input from the surface.
    pub hit_testable: bool,
}

impl EffectDescriptor {
    pub fn new(kind: EffectKind, center: Point, diameter: f32, color: Color) -> Self {
        Self {
            kind,
            center,
            diameter,
            color,
            hit_testable: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered_square(self.center, self.diameter)
    }
}

/// Per-frame animated properties of a mounted effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectFrame {
    pub scale: f32,
    pub opacity: f32,
}

impl EffectFrame {
    pub const HIDDEN: EffectFrame = EffectFrame {
        scale: 0.0,
        opacity: 0.0,
    };

    pub fn new(scale: f32, opacity: f32) -> Self {
        Self { scale, opacity }
    }
}

#[derive(Default)]
struct NodeState {
    mounted: bool,
    render: Option<FrameCallbackRegistration>,
    unmount_timer: Option<TimerRegistration>,
}

/// A mounted effect with a scale track and an opacity track.
///
/// While either track is running the node pushes one [`EffectFrame`] per
/// frame to the surface.
pub(crate) struct EffectNode {
    id: EffectId,
    descriptor: EffectDescriptor,
    surface: Rc<dyn Surface>,
    runtime: RuntimeHandle,
    scale: Animatable<f32>,
    opacity: Animatable<f32>,
    state: RefCell<NodeState>,
}

impl EffectNode {
    pub(crate) fn mount(
        surface: Rc<dyn Surface>,
        runtime: RuntimeHandle,
        id: EffectId,
        descriptor: EffectDescriptor,
        initial: EffectFrame,
    ) -> Result<Rc<Self>, SurfaceError> {
        surface.mount_effect(id, &descriptor)?;
        surface.update_effect(id, initial);
        Ok(Rc::new(Self {
            id,
            descriptor,
            scale: Animatable::new(initial.scale, runtime.clone()),
            opacity: Animatable::new(initial.opacity, runtime.clone()),
            surface,
            runtime,
            state: RefCell::new(NodeState {
                mounted: true,
                ..NodeState::default()
            }),
        }))
    }

    pub(crate) fn id(&self) -> EffectId {
        self.id
    }

    pub(crate) fn descriptor(&self) -> &EffectDescriptor {
        &self.descriptor
    }

    pub(crate) fn now_millis(&self) -> u64 {
        self.runtime.now_millis()
    }

    pub(crate) fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    pub(crate) fn frame_at(&self, time_millis: u64) -> EffectFrame {
        EffectFrame {
            scale: self.scale.value_at(time_millis),
            opacity: self.opacity.value_at(time_millis),
        }
    }

    pub(crate) fn animate_scale(self: &Rc<Self>, target: f32, spec: AnimationSpec) {
        if self.is_mounted() {
            self.scale.animate_to(target, spec);
            self.schedule_render();
        }
    }

    pub(crate) fn animate_opacity(self: &Rc<Self>, target: f32, spec: AnimationSpec) {
        if self.is_mounted() {
            self.opacity.animate_to(target, spec);
            self.schedule_render();
        }
    }

    /// Unmounts after `delay_millis`, then runs `on_unmounted`.
    pub(crate) fn unmount_after(
        self: &Rc<Self>,
        delay_millis: u64,
        on_unmounted: impl FnOnce() + 'static,
    ) {
        if !self.is_mounted() {
            return;
        }
        let weak = Rc::downgrade(self);
        let timer = TimerRegistration::schedule(&self.runtime, delay_millis, move || {
            if let Some(node) = weak.upgrade() {
                node.unmount();
            }
            on_unmounted();
        });
        self.state.borrow_mut().unmount_timer = Some(timer);
    }

    /// Removes the effect from the surface now. Safe to call repeatedly.
    pub(crate) fn unmount(&self) {
        let (render, timer) = {
            let mut state = self.state.borrow_mut();
            if !state.mounted {
                return;
            }
            state.mounted = false;
            (state.render.take(), state.unmount_timer.take())
        };
        drop(render);
        drop(timer);
        self.scale.stop();
        self.opacity.stop();
        self.surface.unmount_effect(self.id);
    }

    fn is_animating_at(&self, time_millis: u64) -> bool {
        [&self.scale, &self.opacity].iter().any(|track| {
            track
                .end_time_millis()
                .is_some_and(|end| end > time_millis)
        })
    }

    fn schedule_render(self: &Rc<Self>) {
        if self.state.borrow().render.is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let registration = self.runtime.frame_clock().with_frame_millis(move |time| {
            if let Some(node) = weak.upgrade() {
                node.render(time);
            }
        });
        if registration.is_active() {
            self.state.borrow_mut().render = Some(registration);
        }
    }

    fn render(self: &Rc<Self>, frame_time_millis: u64) {
        {
            let mut state = self.state.borrow_mut();
            state.render = None;
            if !state.mounted {
                return;
            }
        }
        self.surface
            .update_effect(self.id, self.frame_at(frame_time_millis));
        if self.is_animating_at(frame_time_millis) {
            self.schedule_render();
        }
    }
}
