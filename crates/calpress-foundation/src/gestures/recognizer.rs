//! Drives a [`HoldTapDetector`] with a session timer.

use super::hold_tap::{
    DetectorOutput, GesturePhase, GestureResolution, GestureSession, HoldTapConfig,
    HoldTapDetector, ResolutionCause, SessionId,
};
use crate::input::{PointerEvent, PointerId};
use calpress_core::{RuntimeHandle, SessionTimer};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Receives recognizer transitions. Called with no internal borrows held, so
/// implementations may call back into the recognizer.
pub trait GestureHandler {
    fn on_press(&self, session: &GestureSession);
    fn on_hold_armed(&self, session: &GestureSession);
    fn on_resolved(
        &self,
        session: &GestureSession,
        resolution: GestureResolution,
        cause: ResolutionCause,
    );
}

struct RecognizerState {
    detector: HoldTapDetector,
    timer: SessionTimer,
}

struct Shared {
    runtime: RuntimeHandle,
    state: RefCell<RecognizerState>,
    handler: Weak<dyn GestureHandler>,
}

pub struct HoldTapRecognizer {
    shared: Rc<Shared>,
}

impl HoldTapRecognizer {
    pub fn new(
        runtime: RuntimeHandle,
        config: HoldTapConfig,
        handler: Weak<dyn GestureHandler>,
    ) -> Self {
        let state = RecognizerState {
            detector: HoldTapDetector::new(config),
            timer: SessionTimer::new(runtime.clone()),
        };
        Self {
            shared: Rc::new(Shared {
                runtime,
                state: RefCell::new(state),
                handler,
            }),
        }
    }

    pub fn handle_event(&self, event: &PointerEvent) {
        let output = {
            let mut state = self.shared.state.borrow_mut();
            let now = self.shared.runtime.now_millis();
            let output = state.detector.on_pointer(event, now);
            match &output {
                DetectorOutput::Started {
                    session,
                    arm_hold: true,
                } => {
                    let delay = state.detector.config().hold_threshold_ms;
                    let callback = hold_timeout_callback(
                        Rc::downgrade(&self.shared),
                        session.id,
                        session.pointer_id,
                    );
                    state.timer.arm(delay, callback);
                }
                DetectorOutput::Moved { voided: true } | DetectorOutput::Resolved { .. } => {
                    state.timer.cancel_armed();
                }
                _ => {}
            }
            output
        };
        if !matches!(output, DetectorOutput::Ignored) {
            event.consume();
        }
        Self::notify(&self.shared, output);
    }

    /// Resolves the active session (if any) to `None` without a release.
    pub fn cancel(&self, cause: ResolutionCause) {
        let output = {
            let mut state = self.shared.state.borrow_mut();
            state.timer.cancel_armed();
            state.detector.resolve(cause)
        };
        Self::notify(&self.shared, output);
    }

    pub fn phase(&self) -> GesturePhase {
        self.shared.state.borrow().detector.phase()
    }

    pub fn session(&self) -> Option<GestureSession> {
        self.shared.state.borrow().detector.session().cloned()
    }

    pub fn is_hold_timer_armed(&self) -> bool {
        self.shared.state.borrow().timer.is_armed()
    }

    fn notify(shared: &Shared, output: DetectorOutput) {
        let Some(handler) = shared.handler.upgrade() else {
            return;
        };
        match output {
            DetectorOutput::Started { session, .. } => handler.on_press(&session),
            DetectorOutput::HoldArmed { session } => handler.on_hold_armed(&session),
            DetectorOutput::Resolved {
                session,
                resolution,
                cause,
            } => handler.on_resolved(&session, resolution, cause),
            DetectorOutput::Moved { .. } | DetectorOutput::Ignored => {}
        }
    }
}

fn hold_timeout_callback(
    shared: Weak<Shared>,
    session_id: SessionId,
    pointer_id: PointerId,
) -> impl FnOnce() + 'static {
    move || {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let output = {
            let mut state = shared.state.borrow_mut();
            let output = state.detector.on_hold_timeout(session_id, pointer_id);
            if matches!(output, DetectorOutput::HoldArmed { .. }) {
                // The runtime already dequeued this timer.
                if let Some(handle) = state.timer.armed_handle() {
                    state.timer.mark_fired(handle);
                }
            }
            output
        };
        HoldTapRecognizer::notify(&shared, output);
    }
}
