use calpress_actions::{
    ActionContext, ActionDescriptor, ActionDispatcher, ActionError, CardActionsConfig, HostBridge,
    HostError, HostEvent, ServiceCall,
};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Bridge {
    calls: RefCell<Vec<ServiceCall>>,
    events: RefCell<Vec<HostEvent>>,
}

impl HostBridge for Bridge {
    fn call_service(&self, call: &ServiceCall) -> Result<(), HostError> {
        self.calls.borrow_mut().push(call.clone());
        Ok(())
    }

    fn fire_event(&self, event: HostEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[test]
fn card_config_drives_dispatch() {
    let config = CardActionsConfig::from_json(
        r#"{
            "entities": ["calendar.family", "calendar.work"],
            "max_events_to_show": 3,
            "tap_action": { "action": "more-info" },
            "hold_action": {
                "action": "call-service",
                "service": "script.announce",
                "service_data": { "message": "next event" }
            }
        }"#,
    )
    .expect("valid config");

    let bridge = Rc::new(Bridge::default());
    let dispatcher = ActionDispatcher::new(Some(bridge.clone()), None);
    let context = ActionContext {
        entity: config.primary_entity().map(str::to_string),
        max_events: config.max_events_to_show,
        ..ActionContext::default()
    };

    dispatcher
        .dispatch(&config.tap_descriptor(), &context)
        .expect("more-info");
    dispatcher
        .dispatch(&config.hold_descriptor(), &context)
        .expect("call-service");

    assert_eq!(
        *bridge.events.borrow(),
        vec![HostEvent::MoreInfo {
            entity_id: "calendar.family".into(),
            source: None,
        }]
    );
    assert_eq!(
        *bridge.calls.borrow(),
        vec![ServiceCall {
            domain: "script".into(),
            service: "announce".into(),
            data: json!({ "message": "next event" }),
        }]
    );
}

#[test]
fn service_without_separator_never_reaches_bridge() {
    let config = CardActionsConfig::from_value(json!({
        "hold_action": { "action": "call-service", "service": "light" }
    }))
    .expect("valid config");
    assert!(matches!(
        config.hold_descriptor(),
        ActionDescriptor::CallService { .. }
    ));

    let bridge = Rc::new(Bridge::default());
    let dispatcher = ActionDispatcher::new(Some(bridge.clone()), None);
    let result = dispatcher.dispatch(&config.hold_descriptor(), &ActionContext::default());
    assert!(matches!(result, Err(ActionError::MalformedService { .. })));
    assert!(bridge.calls.borrow().is_empty());
}

#[test]
fn config_round_trips_through_json() {
    let config = CardActionsConfig::from_value(json!({
        "entity": "calendar.home",
        "tap_action": { "action": "navigate", "navigation_path": "/calendar" }
    }))
    .expect("valid config");
    let text = serde_json::to_string(&config).expect("serialize");
    let back = CardActionsConfig::from_json(&text).expect("deserialize");
    assert_eq!(back, config);
}
