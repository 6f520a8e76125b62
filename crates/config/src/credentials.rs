//! Provider credential resolution.
//!
//! Credentials are taken from the loaded config, with the well-known
//! environment variables taking precedence when set. Resolution happens once,
//! when the adapters are built; the result is immutable for the process.

use {
    secrecy::{ExposeSecret, Secret},
    switchboard_common::Error,
};

use crate::schema::{MailConfig, SwitchboardConfig, TwilioConfig, WhatsAppConfig};

pub const GMAIL_ADDRESS: &str = "GMAIL_ADDRESS";
pub const GMAIL_APP_PASSWORD: &str = "GMAIL_APP_PASSWORD";
pub const TWILIO_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
pub const TWILIO_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
pub const TWILIO_PHONE_NUMBER: &str = "TWILIO_PHONE_NUMBER";
pub const WHATSAPP_NUMBER: &str = "WHATSAPP_NUMBER";

/// External providers that need account credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Mail,
    Twilio,
    WhatsApp,
}

impl Provider {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mail => "Gmail",
            Self::Twilio => "Twilio",
            Self::WhatsApp => "WhatsApp",
        }
    }

    /// Environment variables this provider reads.
    pub fn env_vars(self) -> &'static [&'static str] {
        match self {
            Self::Mail => &[GMAIL_ADDRESS, GMAIL_APP_PASSWORD],
            Self::Twilio => &[TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, TWILIO_PHONE_NUMBER],
            Self::WhatsApp => &[WHATSAPP_NUMBER],
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailCredentials {
    pub address: String,
    pub app_password: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: Secret<String>,
    pub phone_number: String,
}

#[derive(Debug, Clone)]
pub struct WhatsAppCredentials {
    pub number: String,
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn present_secret(value: Option<&Secret<String>>) -> Option<Secret<String>> {
    value
        .filter(|s| !s.expose_secret().trim().is_empty())
        .cloned()
}

fn missing(provider: Provider, names: &[&str]) -> Error {
    Error::config(format!(
        "{} credentials not found in environment variables: {} not set",
        provider.label(),
        names.join(", ")
    ))
}

/// Overlay provider environment variables onto the loaded config.
pub fn apply_env_overrides(config: &mut SwitchboardConfig) {
    apply_overrides_with(config, |name| std::env::var(name).ok());
}

/// [`apply_env_overrides`] with an explicit variable lookup.
pub fn apply_overrides_with(config: &mut SwitchboardConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(GMAIL_ADDRESS) {
        config.mail.address = Some(v);
    }
    if let Some(v) = get(GMAIL_APP_PASSWORD) {
        config.mail.app_password = Some(Secret::new(v));
    }
    if let Some(v) = get(TWILIO_ACCOUNT_SID) {
        config.twilio.account_sid = Some(v);
    }
    if let Some(v) = get(TWILIO_AUTH_TOKEN) {
        config.twilio.auth_token = Some(Secret::new(v));
    }
    if let Some(v) = get(TWILIO_PHONE_NUMBER) {
        config.twilio.phone_number = Some(v);
    }
    if let Some(v) = get(WHATSAPP_NUMBER) {
        config.whatsapp.number = Some(v);
    }
    if let Some(port) = get("PORT").and_then(|v| v.trim().parse().ok()) {
        config.server.port = port;
    }
}

impl MailConfig {
    pub fn credentials(&self) -> Result<MailCredentials, Error> {
        let address = present(self.address.as_deref());
        let app_password = present_secret(self.app_password.as_ref());
        match (address, app_password) {
            (Some(address), Some(app_password)) => Ok(MailCredentials {
                address,
                app_password,
            }),
            (address, password) => {
                let mut names = Vec::new();
                if address.is_none() {
                    names.push(GMAIL_ADDRESS);
                }
                if password.is_none() {
                    names.push(GMAIL_APP_PASSWORD);
                }
                Err(missing(Provider::Mail, &names))
            },
        }
    }
}

impl TwilioConfig {
    pub fn credentials(&self) -> Result<TwilioCredentials, Error> {
        let account_sid = present(self.account_sid.as_deref());
        let auth_token = present_secret(self.auth_token.as_ref());
        let phone_number = present(self.phone_number.as_deref());
        match (account_sid, auth_token, phone_number) {
            (Some(account_sid), Some(auth_token), Some(phone_number)) => Ok(TwilioCredentials {
                account_sid,
                auth_token,
                phone_number,
            }),
            (sid, token, number) => {
                let names: Vec<&str> = [
                    (sid.is_none(), TWILIO_ACCOUNT_SID),
                    (token.is_none(), TWILIO_AUTH_TOKEN),
                    (number.is_none(), TWILIO_PHONE_NUMBER),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                Err(missing(Provider::Twilio, &names))
            },
        }
    }
}

impl WhatsAppConfig {
    pub fn credentials(&self) -> Result<WhatsAppCredentials, Error> {
        present(self.number.as_deref())
            .map(|number| WhatsAppCredentials { number })
            .ok_or_else(|| missing(Provider::WhatsApp, &[WHATSAPP_NUMBER]))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, switchboard_common::ErrorKind};

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn env_overrides_config_values() {
        let mut cfg: SwitchboardConfig =
            toml::from_str("[twilio]\naccount_sid = \"ACfile\"\nphone_number = \"+1000\"").unwrap();
        apply_overrides_with(
            &mut cfg,
            env(&[
                ("TWILIO_ACCOUNT_SID", "ACenv"),
                ("TWILIO_AUTH_TOKEN", "tok"),
                ("PORT", "8080"),
            ]),
        );
        let creds = cfg.twilio.credentials().unwrap();
        assert_eq!(creds.account_sid, "ACenv");
        assert_eq!(creds.auth_token.expose_secret(), "tok");
        assert_eq!(creds.phone_number, "+1000");
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn empty_env_does_not_clobber() {
        let mut cfg = SwitchboardConfig::default();
        cfg.whatsapp.number = Some("+15550001".into());
        apply_overrides_with(&mut cfg, env(&[("WHATSAPP_NUMBER", "  ")]));
        assert_eq!(cfg.whatsapp.credentials().unwrap().number, "+15550001");
    }

    #[test]
    fn missing_twilio_credentials_name_every_variable() {
        let cfg = SwitchboardConfig::default();
        let err = cfg.twilio.credentials().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let msg = err.to_string();
        assert!(msg.contains("Twilio credentials not found"));
        assert!(msg.contains(TWILIO_ACCOUNT_SID));
        assert!(msg.contains(TWILIO_AUTH_TOKEN));
        assert!(msg.contains(TWILIO_PHONE_NUMBER));
    }

    #[test]
    fn empty_mail_password_counts_as_missing() {
        let mut cfg = SwitchboardConfig::default();
        apply_overrides_with(&mut cfg, env(&[("GMAIL_ADDRESS", "me@example.com")]));
        cfg.mail.app_password = Some(Secret::new(" ".into()));
        let msg = cfg.mail.credentials().unwrap_err().to_string();
        assert!(msg.contains(GMAIL_APP_PASSWORD));
        assert!(!msg.contains(GMAIL_ADDRESS));
    }

    #[test]
    fn missing_whatsapp_number() {
        let msg = WhatsAppConfig::default().credentials().unwrap_err().to_string();
        assert!(msg.contains(WHATSAPP_NUMBER));
    }

    #[test]
    fn provider_env_vars() {
        assert_eq!(Provider::Mail.env_vars(), &[GMAIL_ADDRESS, GMAIL_APP_PASSWORD]);
        assert_eq!(Provider::Twilio.env_vars().len(), 3);
    }
}
