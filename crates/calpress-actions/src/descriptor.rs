use crate::error::ActionError;
use serde_json::Value;

/// Separator between domain and service in `call-service` actions.
pub const SERVICE_SEPARATOR: char = '.';

/// What a resolved gesture does.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionDescriptor {
    /// Ask the host to show details for the card's primary entity.
    MoreInfo,
    Navigate {
        path: String,
    },
    CallService {
        domain: String,
        service: String,
        data: Value,
    },
    OpenUrl {
        url: String,
        target: Option<String>,
    },
    /// Toggle the card between its limited and full event list.
    Expand,
    None,
    /// A configured kind this build does not understand.
    Unknown(String),
}

/// Validated backend call.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: Value,
}

impl ActionDescriptor {
    pub fn navigate(path: impl Into<String>) -> Self {
        ActionDescriptor::Navigate { path: path.into() }
    }

    /// Builds a call from `"domain.service"`. A string without a separator
    /// keeps an empty service and is rejected at dispatch.
    pub fn call_service(qualified: &str, data: Value) -> Self {
        let (domain, service) = qualified
            .split_once(SERVICE_SEPARATOR)
            .unwrap_or((qualified, ""));
        ActionDescriptor::CallService {
            domain: domain.trim().to_string(),
            service: service.trim().to_string(),
            data,
        }
    }

    pub fn open_url(url: impl Into<String>) -> Self {
        ActionDescriptor::OpenUrl {
            url: url.into(),
            target: None,
        }
    }

    /// Kebab-case kind name as it appears in configuration.
    pub fn kind(&self) -> &str {
        match self {
            ActionDescriptor::MoreInfo => "more-info",
            ActionDescriptor::Navigate { .. } => "navigate",
            ActionDescriptor::CallService { .. } => "call-service",
            ActionDescriptor::OpenUrl { .. } => "url",
            ActionDescriptor::Expand => "expand",
            ActionDescriptor::None => "none",
            ActionDescriptor::Unknown(kind) => kind,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ActionDescriptor::None)
    }

    /// Rejects descriptors that can never be dispatched.
    pub fn validate(&self) -> Result<(), ActionError> {
        match self {
            ActionDescriptor::CallService {
                domain, service, ..
            } => service_call(domain, service, &Value::Null).map(|_| ()),
            _ => Ok(()),
        }
    }
}

pub(crate) fn service_call(
    domain: &str,
    service: &str,
    data: &Value,
) -> Result<ServiceCall, ActionError> {
    let well_formed = |part: &str| !part.is_empty() && !part.contains(SERVICE_SEPARATOR);
    if !well_formed(domain) || !well_formed(service) {
        return Err(ActionError::MalformedService {
            domain: domain.to_string(),
            service: service.to_string(),
        });
    }
    Ok(ServiceCall {
        domain: domain.to_string(),
        service: service.to_string(),
        data: data.clone(),
    })
}

/// Prefixes `https://` onto URLs that are neither http(s) nor root-relative.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn call_service_splits_on_separator() {
        let action = ActionDescriptor::call_service("light.turn_on", json!({"brightness": 10}));
        assert_eq!(
            action,
            ActionDescriptor::CallService {
                domain: "light".into(),
                service: "turn_on".into(),
                data: json!({"brightness": 10}),
            }
        );
        assert!(action.validate().is_ok());
    }

    #[test]
    fn missing_service_segment_is_malformed() {
        for qualified in ["light", "light.", ".turn_on", ""] {
            let action = ActionDescriptor::call_service(qualified, Value::Null);
            assert!(
                matches!(action.validate(), Err(ActionError::MalformedService { .. })),
                "{qualified:?} should be rejected"
            );
        }
    }

    #[test]
    fn extra_separator_is_malformed() {
        let action = ActionDescriptor::CallService {
            domain: "light.turn_on".into(),
            service: String::new(),
            data: Value::Null,
        };
        assert!(action.validate().is_err());
    }

    #[test]
    fn url_normalization() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("HTTP://example.com"), "HTTP://example.com");
        assert_eq!(normalize_url("/lovelace/0"), "/lovelace/0");
        assert_eq!(normalize_url("example.com/a"), "https://example.com/a");
        assert_eq!(normalize_url("  calendar.app "), "https://calendar.app");
    }

    #[test]
    fn kinds_match_configuration_names() {
        assert_eq!(ActionDescriptor::MoreInfo.kind(), "more-info");
        assert_eq!(ActionDescriptor::navigate("/x").kind(), "navigate");
        assert_eq!(ActionDescriptor::open_url("x").kind(), "url");
        assert_eq!(ActionDescriptor::Unknown("fire-dom-event".into()).kind(), "fire-dom-event");
    }
}
