use std::fmt;

/// Lifecycle of the single outstanding request of a chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// No request in flight and no error to show.
    #[default]
    Idle,

    /// A request is in flight; input is disabled.
    Loading,

    /// The last request failed with the given message.
    Error(String),
}

impl RequestStatus {
    /// Returns true while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading)
    }

    /// Returns true if the status is idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestStatus::Idle)
    }

    /// Returns the error message, if the last request failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Idle => write!(f, "idle"),
            RequestStatus::Loading => write!(f, "loading"),
            RequestStatus::Error(message) => write!(f, "error: {message}"),
        }
    }
}
