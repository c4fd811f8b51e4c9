use calpress_actions::{HostBridge, HostError, HostEvent, HostWindow, ServiceCall};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    Service(ServiceCall),
    Event(HostEvent),
    PushLocation(String),
    OpenWindow {
        url: String,
        target: String,
        features: String,
    },
}

/// Host bridge and window that record every call.
#[derive(Default)]
pub struct RecordingHost {
    calls: RefCell<Vec<HostCall>>,
    location: RefCell<String>,
    reject_services: Cell<bool>,
    bridge_unavailable: Cell<bool>,
}

impl RecordingHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            location: RefCell::new("/".to_string()),
            ..Self::default()
        })
    }

    /// Makes `call_service` fail with [`HostError::Rejected`].
    pub fn set_reject_services(&self, reject: bool) {
        self.reject_services.set(reject);
    }

    /// Makes `call_service` fail with [`HostError::Unavailable`].
    pub fn set_bridge_unavailable(&self, unavailable: bool) {
        self.bridge_unavailable.set(unavailable);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn service_calls(&self) -> Vec<ServiceCall> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::Service(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    /// Entity ids of every more-info request.
    pub fn more_info_requests(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::Event(HostEvent::MoreInfo { entity_id, .. }) => Some(entity_id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn location(&self) -> String {
        self.location.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl HostBridge for RecordingHost {
    fn call_service(&self, call: &ServiceCall) -> Result<(), HostError> {
        if self.bridge_unavailable.get() {
            return Err(HostError::Unavailable);
        }
        if self.reject_services.get() {
            return Err(HostError::Rejected(format!(
                "{}.{} failed",
                call.domain, call.service
            )));
        }
        self.record(HostCall::Service(call.clone()));
        Ok(())
    }

    fn fire_event(&self, event: HostEvent) {
        self.record(HostCall::Event(event));
    }
}

impl HostWindow for RecordingHost {
    fn push_location(&self, path: &str) {
        *self.location.borrow_mut() = path.to_string();
        self.record(HostCall::PushLocation(path.to_string()));
    }

    fn open_window(&self, url: &str, target: &str, features: &str) -> Result<(), HostError> {
        self.record(HostCall::OpenWindow {
            url: url.to_string(),
            target: target.to_string(),
            features: features.to_string(),
        });
        Ok(())
    }
}
