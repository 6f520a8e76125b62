use std::time::Duration;

use {
    async_trait::async_trait,
    lettre::{
        AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        transport::smtp::authentication::Credentials,
    },
    secrecy::{ExposeSecret, Secret},
    switchboard_common::{Error, Result},
    tracing::debug,
};

const PROVIDER: &str = "smtp";

/// Hands a fully built message to a mail server.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: Message) -> Result<()>;
}

/// Authenticated STARTTLS relay. Each delivery opens a fresh session.
pub struct SmtpRelay {
    host: String,
    port: u16,
    username: String,
    password: Secret<String>,
    timeout: Duration,
}

impl std::fmt::Debug for SmtpRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpRelay")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl SmtpRelay {
    /// Validates the relay host up front so a bad host fails at startup.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: Secret<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let relay = Self {
            host: host.into(),
            port,
            username: username.into(),
            password,
            timeout,
        };
        relay.build_transport()?;
        Ok(relay)
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| Error::transport(PROVIDER, format!("invalid relay {}: {e}", self.host)))?;
        Ok(builder
            .port(self.port)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.expose_secret().clone(),
            ))
            .timeout(Some(self.timeout))
            .build())
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn deliver(&self, message: Message) -> Result<()> {
        let transport = self.build_transport()?;
        debug!(host = %self.host, port = self.port, "smtp session");
        transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| Error::transport(PROVIDER, e))
    }
}
