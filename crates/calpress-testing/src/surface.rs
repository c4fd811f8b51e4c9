use calpress_foundation::PointerEvent;
use calpress_ui::{
    EffectDescriptor, EffectFrame, EffectId, EffectKind, ListenerId, PointerListener, Surface,
    SurfaceError,
};
use calpress_ui_graphics::Size;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Everything the surface was asked to do, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceRecord {
    Mounted(EffectId, EffectDescriptor),
    Updated(EffectId, EffectFrame),
    Unmounted(EffectId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MountedEffect {
    pub descriptor: EffectDescriptor,
    pub last_frame: Option<EffectFrame>,
    pub frame_count: usize,
}

/// In-memory [`Surface`] that records effect traffic and lets tests emit
/// pointer events through the registered listeners.
pub struct TestSurface {
    size: Cell<Size>,
    attached: Cell<bool>,
    listeners: RefCell<Vec<(ListenerId, PointerListener)>>,
    next_listener_id: Cell<ListenerId>,
    mounted: RefCell<FxHashMap<EffectId, MountedEffect>>,
    records: RefCell<Vec<SurfaceRecord>>,
}

impl TestSurface {
    pub fn new(width: f32, height: f32) -> Rc<Self> {
        Rc::new(Self {
            size: Cell::new(Size::new(width, height)),
            attached: Cell::new(true),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(1),
            mounted: RefCell::new(FxHashMap::default()),
            records: RefCell::new(Vec::new()),
        })
    }

    pub fn set_size(&self, width: f32, height: f32) {
        self.size.set(Size::new(width, height));
    }

    pub fn set_attached(&self, attached: bool) {
        self.attached.set(attached);
    }

    /// Sends `event` to every listener. Returns whether anyone consumed it.
    pub fn emit(&self, event: PointerEvent) -> bool {
        let listeners: Vec<PointerListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event.clone());
        }
        event.is_consumed()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.borrow().len()
    }

    /// Ids of mounted effects of `kind`, ascending.
    pub fn mounted_of_kind(&self, kind: EffectKind) -> Vec<EffectId> {
        let mut ids: Vec<EffectId> = self
            .mounted
            .borrow()
            .iter()
            .filter(|(_, effect)| effect.descriptor.kind == kind)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn effect(&self, id: EffectId) -> Option<MountedEffect> {
        self.mounted.borrow().get(&id).cloned()
    }

    /// How many effects of `kind` were ever mounted.
    pub fn mount_count(&self, kind: EffectKind) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|record| {
                matches!(record, SurfaceRecord::Mounted(_, descriptor) if descriptor.kind == kind)
            })
            .count()
    }

    /// Frames pushed for `id`, across its whole lifetime.
    pub fn frames_of(&self, id: EffectId) -> Vec<EffectFrame> {
        self.records
            .borrow()
            .iter()
            .filter_map(|record| match record {
                SurfaceRecord::Updated(effect, frame) if *effect == id => Some(*frame),
                _ => None,
            })
            .collect()
    }

    pub fn records(&self) -> Vec<SurfaceRecord> {
        self.records.borrow().clone()
    }
}

impl Surface for TestSurface {
    fn size(&self) -> Size {
        self.size.get()
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn add_pointer_listener(&self, listener: PointerListener) -> ListenerId {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_pointer_listener(&self, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn mount_effect(
        &self,
        id: EffectId,
        descriptor: &EffectDescriptor,
    ) -> Result<(), SurfaceError> {
        if !self.attached.get() {
            return Err(SurfaceError::Detached);
        }
        self.mounted.borrow_mut().insert(
            id,
            MountedEffect {
                descriptor: *descriptor,
                last_frame: None,
                frame_count: 0,
            },
        );
        self.records
            .borrow_mut()
            .push(SurfaceRecord::Mounted(id, *descriptor));
        Ok(())
    }

    fn update_effect(&self, id: EffectId, frame: EffectFrame) {
        if let Some(effect) = self.mounted.borrow_mut().get_mut(&id) {
            effect.last_frame = Some(frame);
            effect.frame_count += 1;
            self.records
                .borrow_mut()
                .push(SurfaceRecord::Updated(id, frame));
        }
    }

    fn unmount_effect(&self, id: EffectId) {
        if self.mounted.borrow_mut().remove(&id).is_some() {
            self.records.borrow_mut().push(SurfaceRecord::Unmounted(id));
        }
    }
}
