//! Harness that owns a runtime, a surface, a recording host and one wired
//! interaction, with helpers to drive pointer input on the virtual clock.

use crate::host::RecordingHost;
use crate::surface::TestSurface;
use calpress_actions::{CardActionsConfig, HostBridge, HostWindow};
use calpress_core::Runtime;
use calpress_foundation::{GestureResolution, OrphanRegistry, PointerEvent, PointerId, PointerKind};
use calpress_ui::{setup, GestureResolved, InteractionContext, InteractionHandle, Surface};
use calpress_ui_graphics::Point;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const DEFAULT_WIDTH: f32 = 320.0;
const DEFAULT_HEIGHT: f32 = 120.0;
const SETTLE_LIMIT_MS: u64 = 5_000;

pub struct InteractionTestRuleBuilder {
    config: CardActionsConfig,
    width: f32,
    height: f32,
    bridge: bool,
    window: bool,
    registry: Option<Rc<OrphanRegistry>>,
    pointer_kind: PointerKind,
    entity_source: Option<String>,
}

impl InteractionTestRuleBuilder {
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Leaves the host bridge out of the interaction context.
    pub fn without_bridge(mut self) -> Self {
        self.bridge = false;
        self
    }

    pub fn without_window(mut self) -> Self {
        self.window = false;
        self
    }

    /// Shares an orphan registry with other rules or the test itself.
    pub fn registry(mut self, registry: Rc<OrphanRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn pointer_kind(mut self, pointer_kind: PointerKind) -> Self {
        self.pointer_kind = pointer_kind;
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.entity_source = Some(source.into());
        self
    }

    pub fn build(self) -> InteractionTestRule {
        let runtime = Runtime::new();
        let surface = TestSurface::new(self.width, self.height);
        let host = RecordingHost::new();
        let registry = self
            .registry
            .unwrap_or_else(|| Rc::new(OrphanRegistry::new()));

        let mut context = InteractionContext::new(runtime.handle(), registry.clone());
        if self.bridge {
            let bridge: Rc<dyn HostBridge> = host.clone();
            context = context.with_bridge(bridge);
        }
        if self.window {
            let window: Rc<dyn HostWindow> = host.clone();
            context = context.with_window(window);
        }
        if let Some(source) = self.entity_source {
            context = context.with_source(source);
        }

        let dyn_surface: Rc<dyn Surface> = surface.clone();
        let handle = setup(dyn_surface, &self.config, context);
        let resolutions = Rc::new(RefCell::new(Vec::new()));
        let sink = resolutions.clone();
        handle.on_resolved(move |resolved: &GestureResolved| {
            sink.borrow_mut().push(resolved.clone());
        });

        InteractionTestRule {
            runtime,
            surface,
            host,
            registry,
            handle,
            resolutions,
            pointer_kind: self.pointer_kind,
            pointer_id: Cell::new(1),
            position: Cell::new(Point::ZERO),
        }
    }
}

/// One card wired onto a [`TestSurface`], driven on a virtual clock.
///
/// Pointer helpers go through the surface listener, the same path real
/// input takes.
pub struct InteractionTestRule {
    runtime: Runtime,
    surface: Rc<TestSurface>,
    host: Rc<RecordingHost>,
    registry: Rc<OrphanRegistry>,
    handle: InteractionHandle,
    resolutions: Rc<RefCell<Vec<GestureResolved>>>,
    pointer_kind: PointerKind,
    pointer_id: Cell<PointerId>,
    position: Cell<Point>,
}

impl InteractionTestRule {
    pub fn new(config: CardActionsConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: CardActionsConfig) -> InteractionTestRuleBuilder {
        InteractionTestRuleBuilder {
            config,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            bridge: true,
            window: true,
            registry: None,
            pointer_kind: PointerKind::Mouse,
            entity_source: None,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn now(&self) -> u64 {
        self.runtime.now_millis()
    }

    pub fn surface(&self) -> &Rc<TestSurface> {
        &self.surface
    }

    pub fn host(&self) -> &Rc<RecordingHost> {
        &self.host
    }

    pub fn registry(&self) -> &Rc<OrphanRegistry> {
        &self.registry
    }

    pub fn handle(&self) -> &InteractionHandle {
        &self.handle
    }

    /// Presses with the rule's pointer kind. Returns whether the press was
    /// consumed.
    pub fn press(&self, x: f32, y: f32) -> bool {
        self.press_with(self.pointer_kind, x, y)
    }

    pub fn press_with(&self, pointer_kind: PointerKind, x: f32, y: f32) -> bool {
        let position = Point::new(x, y);
        self.position.set(position);
        self.surface
            .emit(PointerEvent::down(self.pointer_id.get(), position, pointer_kind))
    }

    pub fn move_to(&self, x: f32, y: f32) -> bool {
        let position = Point::new(x, y);
        self.position.set(position);
        self.surface
            .emit(PointerEvent::moved(self.pointer_id.get(), position))
    }

    /// Releases at the last pressed or moved position.
    pub fn release(&self) -> bool {
        self.surface
            .emit(PointerEvent::up(self.pointer_id.get(), self.position.get()))
    }

    pub fn cancel(&self) -> bool {
        self.surface.emit(PointerEvent::cancel(self.pointer_id.get()))
    }

    pub fn leave(&self) -> bool {
        self.surface
            .emit(PointerEvent::leave(self.pointer_id.get(), self.position.get()))
    }

    /// Uses a different pointer id for subsequent helpers.
    pub fn use_pointer(&self, id: PointerId) {
        self.pointer_id.set(id);
    }

    /// Press, wait `duration_ms`, release.
    pub fn press_for(&self, x: f32, y: f32, duration_ms: u64) {
        self.press(x, y);
        self.advance_by(duration_ms);
        self.release();
    }

    pub fn advance_by(&self, delta_ms: u64) {
        self.runtime.advance_by(delta_ms);
    }

    pub fn advance_to(&self, time_ms: u64) {
        self.runtime.advance_to(time_ms);
    }

    /// Runs the clock until every animation and timer has finished.
    pub fn settle(&self) -> bool {
        self.runtime.run_until_idle(SETTLE_LIMIT_MS)
    }

    pub fn resolutions(&self) -> Vec<GestureResolved> {
        self.resolutions.borrow().clone()
    }

    pub fn resolution_count(&self, resolution: GestureResolution) -> usize {
        self.resolutions
            .borrow()
            .iter()
            .filter(|resolved| resolved.resolution == resolution)
            .count()
    }

    /// Every effect is gone from the surface and the registry is empty.
    pub fn assert_no_effects(&self) {
        assert_eq!(
            self.surface.mounted_count(),
            0,
            "effects still mounted: {:?}",
            self.surface.records().last()
        );
        assert!(
            self.registry.is_empty(),
            "{} hold indicators left in the orphan registry",
            self.registry.len()
        );
    }
}
