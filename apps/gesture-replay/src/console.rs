//! Surface and host implementations that print what the engine asks of them.

use calpress_actions::{HostBridge, HostError, HostEvent, HostWindow, ServiceCall};
use calpress_core::RuntimeHandle;
use calpress_foundation::PointerEvent;
use calpress_ui::{
    EffectDescriptor, EffectFrame, EffectId, ListenerId, PointerListener, Surface, SurfaceError,
};
use calpress_ui_graphics::Size;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

fn stamp(runtime: &RuntimeHandle) -> String {
    format!("[{:>5}ms]", runtime.now_millis())
}

pub struct ConsoleSurface {
    runtime: RuntimeHandle,
    size: Size,
    verbose_frames: bool,
    listeners: RefCell<Vec<(ListenerId, PointerListener)>>,
    next_listener: Cell<ListenerId>,
    mounted: RefCell<BTreeSet<EffectId>>,
    frames: Cell<usize>,
}

impl ConsoleSurface {
    pub fn new(runtime: RuntimeHandle, size: Size, verbose_frames: bool) -> Rc<Self> {
        Rc::new(Self {
            runtime,
            size,
            verbose_frames,
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            mounted: RefCell::new(BTreeSet::new()),
            frames: Cell::new(0),
        })
    }

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

    pub fn mounted_count(&self) -> usize {
        self.mounted.borrow().len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.get()
    }
}

impl Surface for ConsoleSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn is_attached(&self) -> bool {
        true
    }

    fn add_pointer_listener(&self, listener: PointerListener) -> ListenerId {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_pointer_listener(&self, id: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(listener, _)| *listener != id);
    }

    fn mount_effect(
        &self,
        id: EffectId,
        descriptor: &EffectDescriptor,
    ) -> Result<(), SurfaceError> {
        let bounds = descriptor.bounds();
        println!(
            "{} mount   #{id} {:?} at ({:.0}, {:.0}) bounds {:.0},{:.0} {:.0}x{:.0}",
            stamp(&self.runtime),
            descriptor.kind,
            descriptor.center.x,
            descriptor.center.y,
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height
        );
        self.mounted.borrow_mut().insert(id);
        Ok(())
    }

    fn update_effect(&self, id: EffectId, frame: EffectFrame) {
        self.frames.set(self.frames.get() + 1);
        if self.verbose_frames {
            println!(
                "{} frame   #{id} scale {:.3} opacity {:.3}",
                stamp(&self.runtime),
                frame.scale,
                frame.opacity
            );
        }
    }

    fn unmount_effect(&self, id: EffectId) {
        if self.mounted.borrow_mut().remove(&id) {
            println!("{} unmount #{id}", stamp(&self.runtime));
        }
    }
}

pub struct ConsoleHost {
    runtime: RuntimeHandle,
    calls: Cell<usize>,
}

impl ConsoleHost {
    pub fn new(runtime: RuntimeHandle) -> Rc<Self> {
        Rc::new(Self {
            runtime,
            calls: Cell::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    fn record(&self, line: std::fmt::Arguments<'_>) {
        self.calls.set(self.calls.get() + 1);
        println!("{} host    {line}", stamp(&self.runtime));
    }
}

impl HostBridge for ConsoleHost {
    fn call_service(&self, call: &ServiceCall) -> Result<(), HostError> {
        self.record(format_args!(
            "call_service {}.{} {}",
            call.domain, call.service, call.data
        ));
        Ok(())
    }

    fn fire_event(&self, event: HostEvent) {
        match event {
            HostEvent::MoreInfo { entity_id, source } => self.record(format_args!(
                "more-info {entity_id} (source {})",
                source.as_deref().unwrap_or("-")
            )),
            HostEvent::LocationChanged { path } => {
                self.record(format_args!("location-changed {path}"))
            }
        }
    }
}

impl HostWindow for ConsoleHost {
    fn push_location(&self, path: &str) {
        self.record(format_args!("push_location {path}"));
    }

    fn open_window(&self, url: &str, target: &str, features: &str) -> Result<(), HostError> {
        self.record(format_args!("open {url} target {target} features {features}"));
        Ok(())
    }
}
