use super::*;
use crate::input::{PointerButton, PointerButtons, PointerKind};

fn detector() -> HoldTapDetector {
    HoldTapDetector::new(HoldTapConfig::default())
}

fn start(detector: &mut HoldTapDetector, id: PointerId, at: Point, now: u64) -> GestureSession {
    match detector.on_pointer(&PointerEvent::down(id, at, PointerKind::Touch), now) {
        DetectorOutput::Started { session, arm_hold } => {
            assert!(arm_hold);
            session
        }
        other => panic!("expected a started session, got {other:?}"),
    }
}

fn resolution(output: DetectorOutput) -> GestureResolution {
    match output {
        DetectorOutput::Resolved { resolution, .. } => resolution,
        other => panic!("expected a resolution, got {other:?}"),
    }
}

#[test]
fn quick_release_is_a_tap() {
    let mut detector = detector();
    let at = Point::new(50.0, 40.0);
    start(&mut detector, 1, at, 0);
    assert_eq!(detector.phase(), GesturePhase::Tracking);

    let output = detector.on_pointer(&PointerEvent::up(1, Point::new(53.0, 42.0)), 100);
    assert_eq!(resolution(output), GestureResolution::Tap);
    assert_eq!(detector.phase(), GesturePhase::Idle);
}

#[test]
fn hold_requires_timer_then_release() {
    let mut detector = detector();
    let session = start(&mut detector, 7, Point::ZERO, 0);

    match detector.on_hold_timeout(session.id, 7) {
        DetectorOutput::HoldArmed { session } => {
            assert!(session.hold_triggered);
            assert!(session.pending_hold_action);
        }
        other => panic!("expected hold to arm, got {other:?}"),
    }
    assert_eq!(detector.phase(), GesturePhase::HoldPending);

    match detector.on_pointer(&PointerEvent::up(7, Point::ZERO), 650) {
        DetectorOutput::Resolved {
            session,
            resolution,
            cause,
        } => {
            assert_eq!(resolution, GestureResolution::Hold);
            assert_eq!(cause, ResolutionCause::Release);
            assert!(!session.pending_hold_action, "pending hold is cleared");
        }
        other => panic!("expected resolution, got {other:?}"),
    }
}

#[test]
fn movement_beyond_threshold_voids_tap() {
    let mut detector = detector();
    start(&mut detector, 1, Point::ZERO, 0);

    assert_eq!(
        detector.on_pointer(&PointerEvent::moved(1, Point::new(6.0, 6.0)), 20),
        DetectorOutput::Moved { voided: false }
    );
    assert_eq!(
        detector.on_pointer(&PointerEvent::moved(1, Point::new(20.0, 0.0)), 40),
        DetectorOutput::Moved { voided: true }
    );
    assert_eq!(
        detector.on_pointer(&PointerEvent::moved(1, Point::new(0.0, 0.0)), 60),
        DetectorOutput::Moved { voided: false },
        "coming back does not restore the gesture"
    );

    let output = detector.on_pointer(&PointerEvent::up(1, Point::ZERO), 80);
    assert_eq!(resolution(output), GestureResolution::None);
}

#[test]
fn movement_wins_over_late_hold_timer() {
    let mut detector = detector();
    let session = start(&mut detector, 1, Point::ZERO, 0);
    detector.on_pointer(&PointerEvent::moved(1, Point::new(0.0, 25.0)), 100);

    assert_eq!(
        detector.on_hold_timeout(session.id, 1),
        DetectorOutput::Ignored
    );
    let output = detector.on_pointer(&PointerEvent::up(1, Point::ZERO), 700);
    assert_eq!(resolution(output), GestureResolution::None);
}

#[test]
fn moving_after_hold_armed_cancels_hold() {
    let mut detector = detector();
    let session = start(&mut detector, 1, Point::ZERO, 0);
    detector.on_hold_timeout(session.id, 1);
    detector.on_pointer(&PointerEvent::moved(1, Point::new(30.0, 0.0)), 550);

    let output = detector.on_pointer(&PointerEvent::up(1, Point::new(30.0, 0.0)), 600);
    assert_eq!(resolution(output), GestureResolution::None);
}

#[test]
fn stale_timer_after_resolution_is_noop() {
    let mut detector = detector();
    let first = start(&mut detector, 1, Point::ZERO, 0);
    detector.on_pointer(&PointerEvent::up(1, Point::ZERO), 100);

    assert_eq!(detector.on_hold_timeout(first.id, 1), DetectorOutput::Ignored);

    let second = start(&mut detector, 1, Point::ZERO, 200);
    assert_ne!(first.id, second.id);
    assert_eq!(
        detector.on_hold_timeout(first.id, 1),
        DetectorOutput::Ignored,
        "timer from an older session must not arm the new one"
    );
    assert_eq!(detector.phase(), GesturePhase::Tracking);
}

#[test]
fn timer_for_other_pointer_is_ignored() {
    let mut detector = detector();
    let session = start(&mut detector, 1, Point::ZERO, 0);
    assert_eq!(detector.on_hold_timeout(session.id, 2), DetectorOutput::Ignored);
}

#[test]
fn second_press_is_ignored_while_active() {
    let mut detector = detector();
    start(&mut detector, 1, Point::ZERO, 0);

    let second = PointerEvent::down(2, Point::new(100.0, 100.0), PointerKind::Touch);
    assert_eq!(detector.on_pointer(&second, 10), DetectorOutput::Ignored);
    assert_eq!(
        detector.on_pointer(&PointerEvent::up(2, Point::ZERO), 20),
        DetectorOutput::Ignored
    );
    assert_eq!(
        detector.on_pointer(&PointerEvent::moved(2, Point::new(300.0, 0.0)), 30),
        DetectorOutput::Ignored
    );

    let output = detector.on_pointer(&PointerEvent::up(1, Point::ZERO), 40);
    assert_eq!(resolution(output), GestureResolution::Tap);
}

#[test]
fn cancel_and_leave_resolve_to_none() {
    for event in [PointerEvent::cancel(1), PointerEvent::leave(1, Point::ZERO)] {
        let mut detector = detector();
        let session = start(&mut detector, 1, Point::ZERO, 0);
        detector.on_hold_timeout(session.id, 1);
        let output = detector.on_pointer(&event, 600);
        assert_eq!(resolution(output), GestureResolution::None);
        assert_eq!(detector.phase(), GesturePhase::Idle);
    }
}

#[test]
fn release_without_session_is_ignored() {
    let mut detector = detector();
    assert_eq!(
        detector.on_pointer(&PointerEvent::up(1, Point::ZERO), 0),
        DetectorOutput::Ignored
    );
    assert_eq!(detector.resolve(ResolutionCause::Teardown), DetectorOutput::Ignored);
}

#[test]
fn secondary_mouse_button_does_not_start_session() {
    let mut detector = detector();
    let event = PointerEvent::new(PointerEventKind::Down, Point::ZERO)
        .with_id(1)
        .with_buttons(PointerButtons::NONE.with(PointerButton::Secondary));
    assert_eq!(detector.on_pointer(&event, 0), DetectorOutput::Ignored);
    assert_eq!(detector.phase(), GesturePhase::Idle);
}

#[test]
fn session_records_press_details() {
    let mut detector = detector();
    let session = start(&mut detector, 4, Point::new(12.0, 8.0), 1_234);
    assert_eq!(session.pointer_id, 4);
    assert_eq!(session.pointer_kind, PointerKind::Touch);
    assert_eq!(session.start_position, Point::new(12.0, 8.0));
    assert_eq!(session.start_time_millis, 1_234);
    assert!(!session.has_moved);
    assert!(!session.hold_triggered);
}
