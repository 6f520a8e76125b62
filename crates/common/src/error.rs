use std::fmt::Display;

/// Closed set of failures an adapter or the dispatch layer can produce.
///
/// Adapters never hand free text back to the caller; the gateway renders
/// these into the `{ "error": ... }` envelope at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A provider credential is absent or empty.
    #[error("{0}")]
    Configuration(String),

    /// The request itself is unusable: missing field, bad value, cap exceeded.
    #[error("{0}")]
    InvalidRequest(String),

    /// The provider could not be reached, rejected the call, or failed mid-way.
    #[error("{provider} error: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    /// The capability was compiled out or failed to initialise at startup.
    #[error("{0} service not available")]
    Unavailable(String),
}

/// Coarse classification used for status-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidRequest,
    Transport,
    Unavailable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn transport(provider: &'static str, err: impl Display) -> Self {
        Self::Transport {
            provider,
            message: err.to_string(),
        }
    }

    pub fn unavailable(service: impl Into<String>) -> Self {
        Self::Unavailable(service.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_names_provider() {
        let err = Error::transport("twilio", "401 Unauthorized");
        assert_eq!(err.to_string(), "twilio error: 401 Unauthorized");
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn unavailable_message() {
        let err = Error::unavailable("SMS");
        assert_eq!(err.to_string(), "SMS service not available");
    }

    #[test]
    fn config_and_invalid_are_passthrough() {
        assert_eq!(Error::config("GMAIL_ADDRESS is not set").to_string(), "GMAIL_ADDRESS is not set");
        assert_eq!(Error::invalid("bad").kind(), ErrorKind::InvalidRequest);
    }
}
