//! Collaborators supplied by the embedding host.

use crate::descriptor::ServiceCall;
use crate::error::HostError;

/// Window features for URLs opened in a new browsing context.
pub const NEW_CONTEXT_FEATURES: &str = "noopener,noreferrer";

/// Fire-and-forget notifications sent to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// Show the details dialog for an entity.
    MoreInfo { entity_id: String, source: Option<String> },
    /// The location was pushed by a navigate action.
    LocationChanged { path: String },
}

/// Backend connection of the host.
pub trait HostBridge {
    /// Request/response call for backend actions.
    fn call_service(&self, call: &ServiceCall) -> Result<(), HostError>;

    fn fire_event(&self, event: HostEvent);
}

/// Navigation surface of the host.
pub trait HostWindow {
    fn push_location(&self, path: &str);

    fn open_window(&self, url: &str, target: &str, features: &str) -> Result<(), HostError>;
}

/// Expand/collapse capability of the card the action came from.
pub trait ExpandToggle {
    /// Flips the state and returns the new value.
    fn toggle_expanded(&self) -> bool;

    fn is_expanded(&self) -> bool;
}
