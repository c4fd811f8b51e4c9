//! Wires a [`Surface`] to gesture recognition, feedback and actions.
//!
//! ```text
//! pointer input ─▶ HoldTapRecognizer ─▶ FeedbackController (ripple, indicator)
//!                          │
//!                          └─ on release ─▶ ActionDispatcher ─▶ host
//! ```

use crate::feedback::{FeedbackController, FeedbackStyle};
use crate::surface::{ListenerId, PointerListener, Surface};
use calpress_actions::{
    ActionContext, ActionDescriptor, ActionDispatcher, CardActionsConfig, DispatchOutcome,
    ExpandToggle, HostBridge, HostWindow,
};
use calpress_core::RuntimeHandle;
use calpress_foundation::gestures::GesturePhase;
use calpress_foundation::{
    GestureHandler, GestureResolution, GestureSession, HoldTapRecognizer, OrphanRegistry,
    PointerDispatcher, PointerEvent, ResolutionCause,
};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Host-provided collaborators for [`setup`].
#[derive(Clone)]
pub struct InteractionContext {
    pub runtime: RuntimeHandle,
    /// Shared with every surface the host wants purged together.
    pub registry: Rc<OrphanRegistry>,
    pub bridge: Option<Rc<dyn HostBridge>>,
    pub window: Option<Rc<dyn HostWindow>>,
    /// Label forwarded with more-info requests.
    pub source: Option<String>,
}

impl InteractionContext {
    pub fn new(runtime: RuntimeHandle, registry: Rc<OrphanRegistry>) -> Self {
        Self {
            runtime,
            registry,
            bridge: None,
            window: None,
            source: None,
        }
    }

    pub fn with_bridge(mut self, bridge: Rc<dyn HostBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn with_window(mut self, window: Rc<dyn HostWindow>) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Notification sent after every gesture resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureResolved {
    pub resolution: GestureResolution,
    pub cause: ResolutionCause,
    /// Kind of the action that ran, if the gesture resolved to one.
    pub action: Option<String>,
    pub outcome: Option<DispatchOutcome>,
    /// Expanded state of the card after the action.
    pub expanded: bool,
}

type ResolvedListener = Rc<dyn Fn(&GestureResolved)>;

#[derive(Default)]
struct ExpandState {
    expanded: Cell<bool>,
}

impl ExpandToggle for ExpandState {
    fn toggle_expanded(&self) -> bool {
        let expanded = !self.expanded.get();
        self.expanded.set(expanded);
        expanded
    }

    fn is_expanded(&self) -> bool {
        self.expanded.get()
    }
}

struct InteractionInner {
    surface: Rc<dyn Surface>,
    recognizer: HoldTapRecognizer,
    feedback: FeedbackController,
    dispatcher: ActionDispatcher,
    tap_action: ActionDescriptor,
    hold_action: ActionDescriptor,
    action_context: ActionContext,
    expand: Rc<ExpandState>,
    queue: RefCell<PointerDispatcher>,
    listeners: RefCell<Vec<ResolvedListener>>,
    pointer_listener: Cell<Option<ListenerId>>,
    torn_down: Cell<bool>,
}

impl InteractionInner {
    fn dispatch_pointer(&self, event: PointerEvent) {
        if self.torn_down.get() {
            log::trace!("pointer event after cleanup ignored");
            return;
        }
        {
            let mut queue = self.queue.borrow_mut();
            queue.push(event);
            if !queue.begin() {
                // Delivered by the dispatch loop further up the stack.
                return;
            }
        }
        loop {
            let next = self.queue.borrow_mut().pop();
            let Some(event) = next else {
                break;
            };
            if self.torn_down.get() {
                break;
            }
            self.recognizer.handle_event(&event);
        }
        let mut queue = self.queue.borrow_mut();
        queue.clear();
        queue.end();
    }

    fn action_for(&self, resolution: GestureResolution) -> Option<&ActionDescriptor> {
        match resolution {
            GestureResolution::Tap => Some(&self.tap_action),
            GestureResolution::Hold => Some(&self.hold_action),
            GestureResolution::None => None,
        }
    }

    fn notify_resolved(&self, resolved: &GestureResolved) {
        let listeners: SmallVec<[ResolvedListener; 2]> =
            self.listeners.borrow().iter().cloned().collect();
        for listener in listeners {
            listener(resolved);
        }
    }

    fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        if let Some(id) = self.pointer_listener.take() {
            self.surface.remove_pointer_listener(id);
        }
        self.recognizer.cancel(ResolutionCause::Teardown);
        self.feedback.clear();
        self.listeners.borrow_mut().clear();
        log::debug!("interaction torn down");
    }
}

impl GestureHandler for InteractionInner {
    fn on_press(&self, session: &GestureSession) {
        log::trace!(
            "session {} pressed at ({:.1}, {:.1})",
            session.id,
            session.start_position.x,
            session.start_position.y
        );
        self.feedback.press(session.start_position);
    }

    fn on_hold_armed(&self, session: &GestureSession) {
        log::debug!("session {} reached the hold threshold", session.id);
        self.feedback
            .show_hold_indicator(session.start_position, session.pointer_kind);
    }

    fn on_resolved(
        &self,
        session: &GestureSession,
        resolution: GestureResolution,
        cause: ResolutionCause,
    ) {
        if cause == ResolutionCause::Teardown {
            self.feedback.clear();
            return;
        }
        self.feedback.release();

        let action = self.action_for(resolution);
        let outcome = action.map(|action| {
            self.dispatcher
                .dispatch_or_log(action, &self.action_context)
        });
        log::debug!(
            "session {} resolved as {resolution:?} ({cause:?}), action {:?}",
            session.id,
            action.map(ActionDescriptor::kind)
        );

        let resolved = GestureResolved {
            resolution,
            cause,
            action: action.map(|action| action.kind().to_string()),
            outcome,
            expanded: self.expand.is_expanded(),
        };
        self.notify_resolved(&resolved);
    }
}

/// Connects `surface` to tap/hold recognition with `config`'s actions.
///
/// Pointer input arriving through the surface's listener (or through
/// [`InteractionHandle::dispatch_pointer`]) starts ripples, arms the hold
/// timer and dispatches actions on release. The interaction stays wired
/// until [`InteractionHandle::cleanup`] is called.
pub fn setup(
    surface: Rc<dyn Surface>,
    config: &CardActionsConfig,
    context: InteractionContext,
) -> InteractionHandle {
    let gesture = config.gesture.validated();
    let tap_action = config.tap_descriptor();
    let hold_action = config.hold_descriptor();
    for (name, action) in [("tap_action", &tap_action), ("hold_action", &hold_action)] {
        if let Err(err) = action.validate() {
            log::error!("{name} is misconfigured: {err}");
        }
    }
    let hold_tap = gesture.hold_tap_config(!hold_action.is_none());
    let style = FeedbackStyle {
        coarse_indicator_size: gesture.coarse_indicator_size,
        fine_indicator_size: gesture.fine_indicator_size,
        ..FeedbackStyle::default()
    };

    let expand = Rc::new(ExpandState::default());
    let action_context = ActionContext {
        entity: config.primary_entity().map(str::to_string),
        source: context.source.clone(),
        max_events: config.max_events_to_show,
        expand: Some(expand.clone()),
    };

    let inner = Rc::new_cyclic(|weak: &Weak<InteractionInner>| {
        let handler: Weak<dyn GestureHandler> = weak.clone();
        InteractionInner {
            recognizer: HoldTapRecognizer::new(context.runtime.clone(), hold_tap, handler),
            feedback: FeedbackController::new(
                context.runtime.clone(),
                surface.clone(),
                context.registry.clone(),
                style,
            ),
            dispatcher: ActionDispatcher::new(context.bridge.clone(), context.window.clone()),
            surface: surface.clone(),
            tap_action,
            hold_action,
            action_context,
            expand,
            queue: RefCell::new(PointerDispatcher::new()),
            listeners: RefCell::new(Vec::new()),
            pointer_listener: Cell::new(None),
            torn_down: Cell::new(false),
        }
    });

    if !surface.is_attached() {
        log::warn!("setting up interaction on a detached surface");
    }
    let listener_target = inner.clone();
    let listener: PointerListener =
        Rc::new(move |event: PointerEvent| listener_target.dispatch_pointer(event));
    let id = surface.add_pointer_listener(listener);
    inner.pointer_listener.set(Some(id));

    InteractionHandle { inner }
}

/// Handle returned by [`setup`].
///
/// Clones share the interaction. Dropping every handle leaves the surface
/// listener in place; call [`cleanup`](Self::cleanup) to tear down.
#[derive(Clone)]
pub struct InteractionHandle {
    inner: Rc<InteractionInner>,
}

impl InteractionHandle {
    /// Cancels the hold timer, removes every effect and detaches the
    /// pointer listener. Idempotent.
    pub fn cleanup(&self) {
        self.inner.teardown();
    }

    pub fn is_active(&self) -> bool {
        !self.inner.torn_down.get()
    }

    pub fn on_resolved(&self, listener: impl Fn(&GestureResolved) + 'static) {
        if self.inner.torn_down.get() {
            return;
        }
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Feeds an event directly, bypassing the surface listener.
    pub fn dispatch_pointer(&self, event: PointerEvent) {
        self.inner.dispatch_pointer(event);
    }

    /// Ends the current gesture without an action, e.g. when the window
    /// loses focus.
    pub fn cancel_gesture(&self) {
        if !self.inner.torn_down.get() {
            self.inner.recognizer.cancel(ResolutionCause::Cancel);
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.inner.recognizer.phase()
    }

    pub fn is_hold_timer_armed(&self) -> bool {
        self.inner.recognizer.is_hold_timer_armed()
    }

    pub fn is_expanded(&self) -> bool {
        self.inner.expand.is_expanded()
    }

    pub fn has_hold_indicator(&self) -> bool {
        self.inner.feedback.has_hold_indicator()
    }

    pub fn live_effect_count(&self) -> usize {
        self.inner.feedback.live_effect_count()
    }

    pub fn feedback(&self) -> &FeedbackController {
        &self.inner.feedback
    }
}
