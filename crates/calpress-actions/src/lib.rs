//! Actions for calpress cards
//!
//! Configuration arrives as [`CardActionsConfig`] (serde), becomes typed
//! [`ActionDescriptor`]s, and the [`ActionDispatcher`] turns a descriptor
//! into a side effect on the host through [`HostBridge`] and [`HostWindow`].

mod config;
mod descriptor;
mod dispatcher;
mod error;
mod host;

pub use config::{ActionConfig, CardActionsConfig, EntityRef, GestureConfig};
pub use descriptor::{normalize_url, ActionDescriptor, ServiceCall, SERVICE_SEPARATOR};
pub use dispatcher::{ActionContext, ActionDispatcher, DispatchOutcome};
pub use error::{ActionError, HostError};
pub use host::{ExpandToggle, HostBridge, HostEvent, HostWindow, NEW_CONTEXT_FEATURES};
