//! Tap versus hold state machine.
//!
//! `Idle -> Tracking -> (HoldPending) -> Resolved(Tap | Hold | None) -> Idle`
//!
//! The detector is pure: it never touches a clock or a timer. The caller
//! feeds it pointer events with a timestamp and tells it when the hold
//! timer fires; the returned [`DetectorOutput`] says what happened.

use crate::gesture_constants::{HOLD_THRESHOLD_MS, MOVE_THRESHOLD};
use crate::input::{PointerEvent, PointerEventKind, PointerId, PointerKind};
use calpress_ui_graphics::Point;

pub type SessionId = u64;

/// Tunables for one surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoldTapConfig {
    pub hold_threshold_ms: u64,
    pub move_threshold: f32,
    /// When false no hold timer is armed and a long press resolves as a tap.
    pub hold_enabled: bool,
}

impl Default for HoldTapConfig {
    fn default() -> Self {
        Self {
            hold_threshold_ms: HOLD_THRESHOLD_MS,
            move_threshold: MOVE_THRESHOLD,
            hold_enabled: true,
        }
    }
}

/// One press-to-release interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureSession {
    pub id: SessionId,
    pub pointer_id: PointerId,
    pub pointer_kind: PointerKind,
    pub start_position: Point,
    pub start_time_millis: u64,
    pub has_moved: bool,
    pub hold_triggered: bool,
    /// Set between the hold threshold firing and release.
    pub pending_hold_action: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Tracking,
    HoldPending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureResolution {
    Tap,
    Hold,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionCause {
    Release,
    Cancel,
    Leave,
    /// Surface torn down or host forced cleanup.
    Teardown,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DetectorOutput {
    Ignored,
    Started {
        session: GestureSession,
        arm_hold: bool,
    },
    Moved {
        /// True only for the move that crossed the threshold.
        voided: bool,
    },
    HoldArmed {
        session: GestureSession,
    },
    Resolved {
        session: GestureSession,
        resolution: GestureResolution,
        cause: ResolutionCause,
    },
}

pub struct HoldTapDetector {
    config: HoldTapConfig,
    session: Option<GestureSession>,
    next_session_id: SessionId,
}

impl HoldTapDetector {
    pub fn new(config: HoldTapConfig) -> Self {
        Self {
            config,
            session: None,
            next_session_id: 1,
        }
    }

    pub fn config(&self) -> HoldTapConfig {
        self.config
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> GesturePhase {
        match &self.session {
            None => GesturePhase::Idle,
            Some(session) if session.pending_hold_action => GesturePhase::HoldPending,
            Some(_) => GesturePhase::Tracking,
        }
    }

    pub fn on_pointer(&mut self, event: &PointerEvent, now_millis: u64) -> DetectorOutput {
        match event.kind {
            PointerEventKind::Down => self.on_down(event, now_millis),
            PointerEventKind::Move => self.on_move(event),
            PointerEventKind::Up => self.resolve_for(event.id, ResolutionCause::Release),
            PointerEventKind::Cancel => self.resolve_for(event.id, ResolutionCause::Cancel),
            PointerEventKind::Leave => self.resolve_for(event.id, ResolutionCause::Leave),
        }
    }

    fn on_down(&mut self, event: &PointerEvent, now_millis: u64) -> DetectorOutput {
        if let Some(active) = &self.session {
            log::trace!(
                "press from pointer {} ignored; session {} still active",
                event.id,
                active.id
            );
            return DetectorOutput::Ignored;
        }
        if !event.is_primary_press() {
            return DetectorOutput::Ignored;
        }

        let id = self.next_session_id;
        self.next_session_id += 1;
        let session = GestureSession {
            id,
            pointer_id: event.id,
            pointer_kind: event.pointer_kind,
            start_position: event.position,
            start_time_millis: now_millis,
            has_moved: false,
            hold_triggered: false,
            pending_hold_action: false,
        };
        self.session = Some(session.clone());
        DetectorOutput::Started {
            session,
            arm_hold: self.config.hold_enabled,
        }
    }

    fn on_move(&mut self, event: &PointerEvent) -> DetectorOutput {
        let threshold = self.config.move_threshold;
        let Some(session) = self.session.as_mut() else {
            return DetectorOutput::Ignored;
        };
        if session.pointer_id != event.id {
            return DetectorOutput::Ignored;
        }
        if session.has_moved {
            return DetectorOutput::Moved { voided: false };
        }
        let displacement = session.start_position.distance_to(event.position);
        if displacement > threshold {
            session.has_moved = true;
            log::trace!(
                "session {} voided after moving {displacement:.1}px",
                session.id
            );
            return DetectorOutput::Moved { voided: true };
        }
        DetectorOutput::Moved { voided: false }
    }

    /// The hold timer fired. Stale timers (wrong session, wrong pointer,
    /// already moved or resolved) are ignored.
    pub fn on_hold_timeout(
        &mut self,
        session_id: SessionId,
        pointer_id: PointerId,
    ) -> DetectorOutput {
        let Some(session) = self.session.as_mut() else {
            log::trace!("hold timer for session {session_id} fired after resolution");
            return DetectorOutput::Ignored;
        };
        if session.id != session_id || session.pointer_id != pointer_id {
            log::trace!(
                "hold timer for session {session_id} fired during session {}",
                session.id
            );
            return DetectorOutput::Ignored;
        }
        if session.has_moved || session.hold_triggered {
            return DetectorOutput::Ignored;
        }
        session.hold_triggered = true;
        session.pending_hold_action = true;
        DetectorOutput::HoldArmed {
            session: session.clone(),
        }
    }

    fn resolve_for(&mut self, pointer_id: PointerId, cause: ResolutionCause) -> DetectorOutput {
        match &self.session {
            Some(session) if session.pointer_id == pointer_id => self.resolve(cause),
            _ => DetectorOutput::Ignored,
        }
    }

    /// Ends the active session, whatever pointer it belongs to.
    pub fn resolve(&mut self, cause: ResolutionCause) -> DetectorOutput {
        let Some(mut session) = self.session.take() else {
            return DetectorOutput::Ignored;
        };
        let resolution = match cause {
            ResolutionCause::Release => {
                if session.pending_hold_action && !session.has_moved {
                    GestureResolution::Hold
                } else if !session.hold_triggered && !session.has_moved {
                    GestureResolution::Tap
                } else {
                    GestureResolution::None
                }
            }
            ResolutionCause::Cancel | ResolutionCause::Leave | ResolutionCause::Teardown => {
                GestureResolution::None
            }
        };
        session.pending_hold_action = false;
        DetectorOutput::Resolved {
            session,
            resolution,
            cause,
        }
    }
}

#[cfg(test)]
#[path = "../tests/hold_tap_tests.rs"]
mod tests;
