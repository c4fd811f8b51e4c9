use crate::descriptor::{normalize_url, service_call, ActionDescriptor};
use crate::error::ActionError;
use crate::host::{ExpandToggle, HostBridge, HostEvent, HostWindow, NEW_CONTEXT_FEATURES};
use std::rc::Rc;

const DEFAULT_URL_TARGET: &str = "_blank";

/// Per-surface inputs to a dispatch.
#[derive(Clone, Default)]
pub struct ActionContext {
    /// Primary entity of the card.
    pub entity: Option<String>,
    /// Label of the surface the gesture happened on.
    pub source: Option<String>,
    pub max_events: Option<u32>,
    pub expand: Option<Rc<dyn ExpandToggle>>,
}

impl ActionContext {
    pub fn for_entity(entity: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
            ..Self::default()
        }
    }

    fn primary_entity(&self) -> Option<&str> {
        self.entity.as_deref().filter(|id| !id.trim().is_empty())
    }

    fn expand_enabled(&self) -> bool {
        matches!(self.max_events, Some(limit) if limit > 0)
    }
}

impl std::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("entity", &self.entity)
            .field("source", &self.source)
            .field("max_events", &self.max_events)
            .field("expand", &self.expand.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The host was asked to do something.
    Performed,
    /// The card toggled its expanded state; carries the new state.
    Expanded(bool),
    /// Nothing to do (`none`, unknown kinds, expand without a limit).
    Skipped,
}

/// Turns descriptors into host side effects.
///
/// Either collaborator may be missing; actions that need it fail with an
/// environment error instead of panicking.
#[derive(Clone, Default)]
pub struct ActionDispatcher {
    bridge: Option<Rc<dyn HostBridge>>,
    window: Option<Rc<dyn HostWindow>>,
}

impl ActionDispatcher {
    pub fn new(bridge: Option<Rc<dyn HostBridge>>, window: Option<Rc<dyn HostWindow>>) -> Self {
        Self { bridge, window }
    }

    pub fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    pub fn dispatch(
        &self,
        action: &ActionDescriptor,
        context: &ActionContext,
    ) -> Result<DispatchOutcome, ActionError> {
        match action {
            ActionDescriptor::MoreInfo => {
                let entity_id = context.primary_entity().ok_or(ActionError::MissingEntity)?;
                let bridge = self.bridge()?;
                bridge.fire_event(HostEvent::MoreInfo {
                    entity_id: entity_id.to_string(),
                    source: context.source.clone(),
                });
                Ok(DispatchOutcome::Performed)
            }
            ActionDescriptor::Navigate { path } => {
                let path = path.trim();
                if path.is_empty() {
                    return Err(ActionError::MissingPath);
                }
                let window = self.window.as_ref().ok_or(ActionError::WindowUnavailable)?;
                window.push_location(path);
                match &self.bridge {
                    Some(bridge) => bridge.fire_event(HostEvent::LocationChanged {
                        path: path.to_string(),
                    }),
                    None => log::debug!("location changed to {path} without a bridge to notify"),
                }
                Ok(DispatchOutcome::Performed)
            }
            ActionDescriptor::CallService {
                domain,
                service,
                data,
            } => {
                let call = service_call(domain, service, data)?;
                let bridge = self.bridge()?;
                bridge.call_service(&call)?;
                Ok(DispatchOutcome::Performed)
            }
            ActionDescriptor::OpenUrl { url, target } => {
                if url.trim().is_empty() {
                    return Err(ActionError::MissingUrl);
                }
                let window = self.window.as_ref().ok_or(ActionError::WindowUnavailable)?;
                let target = target
                    .as_deref()
                    .filter(|target| !target.is_empty())
                    .unwrap_or(DEFAULT_URL_TARGET);
                window.open_window(&normalize_url(url), target, NEW_CONTEXT_FEATURES)?;
                Ok(DispatchOutcome::Performed)
            }
            ActionDescriptor::Expand => {
                if !context.expand_enabled() {
                    return Ok(DispatchOutcome::Skipped);
                }
                match &context.expand {
                    Some(toggle) => Ok(DispatchOutcome::Expanded(toggle.toggle_expanded())),
                    None => {
                        log::warn!("expand requested but the card cannot toggle");
                        Ok(DispatchOutcome::Skipped)
                    }
                }
            }
            ActionDescriptor::None => Ok(DispatchOutcome::Skipped),
            ActionDescriptor::Unknown(kind) => {
                log::warn!("unknown action kind '{kind}' ignored");
                Ok(DispatchOutcome::Skipped)
            }
        }
    }

    /// [`dispatch`](Self::dispatch) with the error absorbed and logged at
    /// its severity.
    pub fn dispatch_or_log(
        &self,
        action: &ActionDescriptor,
        context: &ActionContext,
    ) -> DispatchOutcome {
        match self.dispatch(action, context) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::log!(err.severity(), "{} action not dispatched: {err}", action.kind());
                DispatchOutcome::Skipped
            }
        }
    }

    fn bridge(&self) -> Result<&Rc<dyn HostBridge>, ActionError> {
        self.bridge.as_ref().ok_or(ActionError::BridgeUnavailable)
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
