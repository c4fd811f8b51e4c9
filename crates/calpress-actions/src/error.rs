use log::Level;

/// Failure reported by a host collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host refused or failed the request.
    Rejected(String),
    /// The host side of the call is not available right now.
    Unavailable,
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::Rejected(reason) => write!(f, "host rejected request: {reason}"),
            HostError::Unavailable => write!(f, "host unavailable"),
        }
    }
}

impl std::error::Error for HostError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    /// `call-service` without both a domain and a service name.
    MalformedService { domain: String, service: String },
    /// `more-info` with no entity to show.
    MissingEntity,
    /// `navigate` without a path.
    MissingPath,
    /// `url` without a URL.
    MissingUrl,
    /// No host bridge to send the call through.
    BridgeUnavailable,
    /// No host window to navigate or open URLs with.
    WindowUnavailable,
    Host(HostError),
}

impl ActionError {
    /// Log level the error is reported at once absorbed.
    ///
    /// Broken configuration is an error; a missing target or an absent
    /// environment piece only warrants a warning.
    pub fn severity(&self) -> Level {
        match self {
            ActionError::MalformedService { .. } => Level::Error,
            ActionError::Host(HostError::Rejected(_)) => Level::Error,
            ActionError::MissingEntity
            | ActionError::MissingPath
            | ActionError::MissingUrl
            | ActionError::BridgeUnavailable
            | ActionError::WindowUnavailable
            | ActionError::Host(HostError::Unavailable) => Level::Warn,
        }
    }
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::MalformedService { domain, service } => write!(
                f,
                "malformed service call '{domain}.{service}'; expected 'domain.service'"
            ),
            ActionError::MissingEntity => write!(f, "no entity available for more-info"),
            ActionError::MissingPath => write!(f, "navigate action has no navigation_path"),
            ActionError::MissingUrl => write!(f, "url action has no url_path"),
            ActionError::BridgeUnavailable => write!(f, "host bridge unavailable"),
            ActionError::WindowUnavailable => write!(f, "host window unavailable"),
            ActionError::Host(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActionError::Host(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HostError> for ActionError {
    fn from(err: HostError) -> Self {
        ActionError::Host(err)
    }
}
