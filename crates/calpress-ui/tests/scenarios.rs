use calpress_actions::{ActionConfig, CardActionsConfig, DispatchOutcome};
use calpress_foundation::{GestureResolution, OrphanRegistry, PointerEvent, PointerKind};
use calpress_testing::{HostCall, InteractionTestRule};
use calpress_ui::EffectKind;
use calpress_ui_graphics::Point;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn more_info_on_tap() {
    let config = CardActionsConfig {
        entity: Some("foo".into()),
        tap_action: ActionConfig::of_kind("more-info"),
        ..CardActionsConfig::default()
    };
    let rule = InteractionTestRule::new(config);
    rule.press(100.0, 50.0);
    rule.advance_to(100);
    rule.release();
    rule.settle();

    assert_eq!(rule.host().more_info_requests(), vec!["foo"]);
    assert_eq!(rule.host().calls().len(), 1);
}

#[test]
fn navigate_on_hold() {
    let config = CardActionsConfig::from_value(json!({
        "entity": "calendar.family",
        "tap_action": { "action": "more-info" },
        "hold_action": { "action": "navigate", "navigation_path": "/settings" }
    }))
    .expect("config");
    let rule = InteractionTestRule::new(config);
    rule.press(100.0, 50.0);
    rule.advance_to(499);
    assert_eq!(rule.surface().mount_count(EffectKind::HoldIndicator), 0);
    rule.advance_to(500);
    assert_eq!(
        rule.surface().mounted_of_kind(EffectKind::HoldIndicator).len(),
        1
    );
    rule.advance_to(600);
    rule.release();
    rule.settle();

    assert_eq!(rule.host().location(), "/settings");
    assert!(rule.host().more_info_requests().is_empty());
}

#[test]
fn malformed_service_is_never_called() {
    let config = CardActionsConfig::from_value(json!({
        "hold_action": { "action": "call-service", "service": "light" }
    }))
    .expect("config");
    let rule = InteractionTestRule::new(config);
    rule.press(100.0, 50.0);
    rule.advance_to(500);
    assert!(rule.handle().has_hold_indicator());
    rule.advance_to(600);
    rule.release();
    rule.settle();

    assert!(rule.host().service_calls().is_empty());
    let resolutions = rule.resolutions();
    assert_eq!(resolutions.len(), 1);
    assert_eq!(resolutions[0].resolution, GestureResolution::Hold);
    assert_eq!(resolutions[0].action.as_deref(), Some("call-service"));
    assert_eq!(resolutions[0].outcome, Some(DispatchOutcome::Skipped));
    rule.assert_no_effects();
}

#[test]
fn valid_service_reaches_bridge() {
    let config = CardActionsConfig::from_value(json!({
        "hold_action": {
            "action": "perform-action",
            "perform_action": "light.turn_on",
            "data": { "entity_id": "light.hall" }
        }
    }))
    .expect("config");
    let rule = InteractionTestRule::new(config);
    rule.press_for(10.0, 10.0, 650);
    let calls = rule.host().service_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].domain, "light");
    assert_eq!(calls[0].service, "turn_on");
    assert_eq!(calls[0].data, json!({ "entity_id": "light.hall" }));
}

#[test]
fn missing_bridge_degrades_to_no_op() {
    let config = CardActionsConfig {
        entity: Some("calendar.family".into()),
        tap_action: ActionConfig::of_kind("more-info"),
        ..CardActionsConfig::default()
    };
    let rule = InteractionTestRule::builder(config).without_bridge().build();
    rule.press_for(10.0, 10.0, 80);
    rule.settle();
    assert!(rule.host().calls().is_empty());
    assert_eq!(rule.resolutions()[0].outcome, Some(DispatchOutcome::Skipped));
    rule.assert_no_effects();
}

#[test]
fn host_rejection_is_absorbed() {
    let config = CardActionsConfig::from_value(json!({
        "tap_action": { "action": "call-service", "service": "script.run" }
    }))
    .expect("config");
    let rule = InteractionTestRule::new(config);
    rule.host().set_reject_services(true);
    rule.press_for(10.0, 10.0, 80);
    assert_eq!(rule.resolutions()[0].outcome, Some(DispatchOutcome::Skipped));

    rule.host().set_reject_services(false);
    rule.press_for(10.0, 10.0, 80);
    assert_eq!(rule.host().service_calls().len(), 1);
}

#[test]
fn url_opens_detached_from_opener() {
    let config = CardActionsConfig::from_value(json!({
        "tap_action": { "action": "url", "url_path": "calendar.example.com" }
    }))
    .expect("config");
    let rule = InteractionTestRule::new(config);
    rule.press_for(10.0, 10.0, 50);
    assert_eq!(
        rule.host().calls(),
        vec![HostCall::OpenWindow {
            url: "https://calendar.example.com".into(),
            target: "_blank".into(),
            features: "noopener,noreferrer".into(),
        }]
    );
}

#[test]
fn expand_toggles_only_with_event_limit() {
    let limited = InteractionTestRule::new(CardActionsConfig {
        max_events_to_show: Some(3),
        ..CardActionsConfig::default()
    });
    limited.press_for(10.0, 10.0, 50);
    assert!(limited.handle().is_expanded());
    assert!(limited.resolutions()[0].expanded);
    limited.press_for(10.0, 10.0, 50);
    assert!(!limited.handle().is_expanded());
    assert_eq!(
        limited.resolutions()[1].outcome,
        Some(DispatchOutcome::Expanded(false))
    );

    let unlimited = InteractionTestRule::new(CardActionsConfig::default());
    unlimited.press_for(10.0, 10.0, 50);
    assert!(!unlimited.handle().is_expanded());
    assert_eq!(
        unlimited.resolutions()[0].outcome,
        Some(DispatchOutcome::Skipped)
    );
}

#[test]
fn unknown_action_is_ignored() {
    let config = CardActionsConfig::from_value(json!({
        "tap_action": { "action": "fire-dom-event" }
    }))
    .expect("config");
    let rule = InteractionTestRule::new(config);
    rule.press_for(10.0, 10.0, 50);
    assert!(rule.host().calls().is_empty());
    assert_eq!(rule.resolutions()[0].action.as_deref(), Some("fire-dom-event"));
}

#[test]
fn cleanup_tears_everything_down() {
    let config = CardActionsConfig::from_value(json!({
        "entity": "calendar.family",
        "tap_action": { "action": "more-info" },
        "hold_action": { "action": "navigate", "navigation_path": "/settings" }
    }))
    .expect("config");
    let rule = InteractionTestRule::new(config);
    assert_eq!(rule.surface().listener_count(), 1);
    rule.press(10.0, 10.0);
    rule.advance_to(520);
    assert_eq!(rule.surface().mounted_count(), 2);

    rule.handle().cleanup();
    assert!(!rule.handle().is_active());
    assert_eq!(rule.surface().listener_count(), 0);
    rule.assert_no_effects();
    assert!(!rule.runtime().has_pending_work());

    assert!(!rule.release());
    rule.handle().dispatch_pointer(PointerEvent::up(1, Point::new(10.0, 10.0)));
    rule.handle().cleanup();
    rule.settle();
    assert!(rule.host().calls().is_empty());
    assert!(rule.resolutions().is_empty());
}

#[test]
fn cleanup_from_resolution_listener() {
    let rule = InteractionTestRule::new(CardActionsConfig {
        entity: Some("calendar.family".into()),
        tap_action: ActionConfig::of_kind("more-info"),
        ..CardActionsConfig::default()
    });
    let handle = rule.handle().clone();
    let fired = Rc::new(Cell::new(0));
    let count = fired.clone();
    rule.handle().on_resolved(move |_| {
        count.set(count.get() + 1);
        handle.cleanup();
    });
    rule.press_for(10.0, 10.0, 50);
    rule.press_for(10.0, 10.0, 50);
    rule.settle();

    assert_eq!(fired.get(), 1);
    assert_eq!(rule.host().more_info_requests().len(), 1);
    rule.assert_no_effects();
}

#[test]
fn shared_registry_purges_indicators_across_cards() {
    let registry = Rc::new(OrphanRegistry::new());
    let hold_config = || {
        CardActionsConfig::from_value(json!({
            "hold_action": { "action": "navigate", "navigation_path": "/x" }
        }))
        .expect("config")
    };
    let first = InteractionTestRule::builder(hold_config())
        .registry(registry.clone())
        .pointer_kind(PointerKind::Touch)
        .build();
    let second = InteractionTestRule::builder(hold_config())
        .registry(registry.clone())
        .build();

    first.press(10.0, 10.0);
    second.press(10.0, 10.0);
    first.advance_to(500);
    second.advance_to(500);
    assert_eq!(registry.len(), 2);

    let touch = first.surface().mounted_of_kind(EffectKind::HoldIndicator);
    let mouse = second.surface().mounted_of_kind(EffectKind::HoldIndicator);
    assert_eq!(first.surface().effect(touch[0]).expect("effect").descriptor.diameter, 80.0);
    assert_eq!(second.surface().effect(mouse[0]).expect("effect").descriptor.diameter, 50.0);

    assert_eq!(registry.purge_all(), 2);
    assert!(registry.is_empty());
    assert!(first.surface().mounted_of_kind(EffectKind::HoldIndicator).is_empty());
    assert!(second.surface().mounted_of_kind(EffectKind::HoldIndicator).is_empty());

    // The gesture itself is still live; only the visuals were purged.
    first.release();
    assert_eq!(first.host().location(), "/x");
    first.settle();
    first.assert_no_effects();
}

#[test]
fn detached_surface_still_dispatches() {
    let rule = InteractionTestRule::new(CardActionsConfig {
        entity: Some("calendar.family".into()),
        tap_action: ActionConfig::of_kind("more-info"),
        ..CardActionsConfig::default()
    });
    rule.surface().set_attached(false);
    rule.press_for(10.0, 10.0, 50);
    assert_eq!(rule.surface().mount_count(EffectKind::Ripple), 0);
    assert_eq!(rule.host().more_info_requests().len(), 1);
}

#[test]
fn ripple_descriptor_covers_surface() {
    let rule = InteractionTestRule::builder(CardActionsConfig::default())
        .size(300.0, 90.0)
        .build();
    rule.press(20.0, 80.0);
    let ripples = rule.surface().mounted_of_kind(EffectKind::Ripple);
    let effect = rule.surface().effect(ripples[0]).expect("ripple");
    assert_eq!(effect.descriptor.center, Point::new(20.0, 80.0));
    assert_eq!(effect.descriptor.diameter, 750.0);
    assert!(!effect.descriptor.hit_testable);
    let bounds = effect.descriptor.bounds();
    assert_eq!((bounds.x, bounds.y), (-355.0, -295.0));
    assert_eq!((bounds.width, bounds.height), (750.0, 750.0));

    rule.advance_to(100);
    rule.release();
    // progress 0.25: 255ms grace, then a 250ms fade.
    rule.advance_to(604);
    assert_eq!(rule.surface().mounted_count(), 1);
    rule.advance_to(605);
    assert_eq!(rule.surface().mounted_count(), 0);
    let frames = rule.surface().frames_of(ripples[0]);
    assert!(frames.len() > 10);
    assert!(frames.last().expect("frame").opacity < 0.02);
}

#[test]
fn cancel_gesture_from_host() {
    let rule = InteractionTestRule::new(CardActionsConfig::from_value(json!({
        "hold_action": { "action": "navigate", "navigation_path": "/x" }
    }))
    .expect("config"));
    rule.press(10.0, 10.0);
    rule.advance_to(700);
    rule.handle().cancel_gesture();
    rule.release();
    rule.settle();
    assert!(rule.host().calls().is_empty());
    assert_eq!(rule.resolution_count(GestureResolution::None), 1);
    rule.assert_no_effects();
}
