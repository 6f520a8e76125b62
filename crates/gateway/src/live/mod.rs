//! Adapter-backed services, one module per Cargo feature.

#[cfg(feature = "instagram")]
pub mod instagram;
#[cfg(feature = "mail")]
pub mod mail;
#[cfg(feature = "sms")]
pub mod sms;
#[cfg(feature = "ssh")]
pub mod ssh;
#[cfg(feature = "whatsapp")]
pub mod whatsapp;

use {
    crate::services::ServiceStatus,
    switchboard_common::{Error, ErrorKind, Result},
};

/// An adapter built at startup, or the reason its credentials were rejected.
///
/// Missing credentials are not fatal: the route stays up and every call
/// answers with the configuration error.
#[derive(Debug)]
pub enum Provisioned<T> {
    Ready(T),
    Missing(String),
}

impl<T> Provisioned<T> {
    /// Sort a construction result. Errors other than missing credentials
    /// are returned so the caller can fall back to the noop service.
    pub fn resolve(result: Result<T>) -> Result<Self> {
        match result {
            Ok(value) => Ok(Self::Ready(value)),
            Err(e) if e.kind() == ErrorKind::Configuration => Ok(Self::Missing(e.to_string())),
            Err(e) => Err(e),
        }
    }

    pub fn get(&self) -> Result<&T> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Missing(reason) => Err(Error::config(reason.clone())),
        }
    }

    pub fn status(&self) -> ServiceStatus {
        match self {
            Self::Ready(_) => ServiceStatus::Ready,
            Self::Missing(_) => ServiceStatus::MissingCredentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_sorts_errors() {
        let ready = Provisioned::resolve(Ok(1)).unwrap();
        assert_eq!(*ready.get().unwrap(), 1);

        let missing = Provisioned::<u8>::resolve(Err(Error::config("no token"))).unwrap();
        assert_eq!(missing.status(), ServiceStatus::MissingCredentials);
        assert_eq!(missing.get().unwrap_err().kind(), ErrorKind::Configuration);

        assert!(Provisioned::<u8>::resolve(Err(Error::transport("smtp", "bad host"))).is_err());
    }
}
