use super::effect::{EffectDescriptor, EffectFrame, EffectId, EffectKind, EffectNode};
use crate::surface::{Surface, SurfaceError};
use calpress_animation::{AnimationSpec, Easing};
use calpress_core::RuntimeHandle;
use calpress_foundation::{OrphanKey, OrphanRegistry, OrphanedEffect};
use calpress_ui_graphics::{Color, Point};
use std::cell::Cell;
use std::rc::{Rc, Weak};

pub const HOLD_INDICATOR_SHOW_MS: u64 = 200;
pub const HOLD_INDICATOR_FADE_MS: u64 = 300;
pub const HOLD_INDICATOR_OPACITY: f32 = 0.2;
const HOLD_INDICATOR_EXIT_SCALE: f32 = 0.9;

/// Cue shown once a press has lasted long enough to resolve as a hold.
///
/// Lives in the [`OrphanRegistry`] from creation until it is unmounted, so a
/// host-wide purge can remove it even if the owning surface never finishes
/// its own cleanup.
pub struct HoldIndicator {
    node: Rc<EffectNode>,
    position: Point,
    size: f32,
    created_at: u64,
    registry: Weak<OrphanRegistry>,
    orphan_key: Cell<Option<OrphanKey>>,
    removing: Cell<bool>,
}

impl HoldIndicator {
    pub fn show(
        surface: Rc<dyn Surface>,
        runtime: RuntimeHandle,
        registry: &Rc<OrphanRegistry>,
        id: EffectId,
        position: Point,
        size: f32,
        color: Color,
    ) -> Result<Rc<Self>, SurfaceError> {
        let created_at = runtime.now_millis();
        let descriptor = EffectDescriptor::new(EffectKind::HoldIndicator, position, size, color);
        let node = EffectNode::mount(surface, runtime, id, descriptor, EffectFrame::HIDDEN)?;
        let spec = AnimationSpec::tween(HOLD_INDICATOR_SHOW_MS, Easing::FastOutSlowInEasing);
        node.animate_scale(1.0, spec);
        node.animate_opacity(HOLD_INDICATOR_OPACITY, spec);

        let indicator = Rc::new(Self {
            node,
            position,
            size,
            created_at,
            registry: Rc::downgrade(registry),
            orphan_key: Cell::new(None),
            removing: Cell::new(false),
        });
        let weak: Weak<HoldIndicator> = Rc::downgrade(&indicator);
        indicator.orphan_key.set(Some(registry.register(weak)));
        Ok(indicator)
    }

    pub fn id(&self) -> EffectId {
        self.node.id()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn is_mounted(&self) -> bool {
        self.node.is_mounted()
    }

    pub fn is_removing(&self) -> bool {
        self.removing.get()
    }

    pub fn frame_at(&self, time_millis: u64) -> EffectFrame {
        self.node.frame_at(time_millis)
    }

    /// Fades out and unmounts after [`HOLD_INDICATOR_FADE_MS`].
    pub fn remove(self: &Rc<Self>) {
        if self.removing.replace(true) || !self.node.is_mounted() {
            return;
        }
        let spec = AnimationSpec::tween(HOLD_INDICATOR_FADE_MS, Easing::FastOutLinearEasing);
        self.node.animate_opacity(0.0, spec);
        self.node.animate_scale(HOLD_INDICATOR_EXIT_SCALE, spec);
        let weak = Rc::downgrade(self);
        self.node.unmount_after(HOLD_INDICATOR_FADE_MS, move || {
            if let Some(indicator) = weak.upgrade() {
                indicator.deregister();
            }
        });
    }

    /// Unmounts immediately.
    pub fn purge_now(&self) {
        self.removing.set(true);
        self.node.unmount();
        self.deregister();
    }

    fn deregister(&self) {
        if let Some(key) = self.orphan_key.take() {
            if let Some(registry) = self.registry.upgrade() {
                registry.deregister(key);
            }
        }
    }
}

impl OrphanedEffect for HoldIndicator {
    fn purge(&self) {
        log::debug!("hold indicator {} purged", self.node.id());
        self.purge_now();
    }
}
