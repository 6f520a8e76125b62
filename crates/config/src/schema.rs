//! Config schema: server, provider credentials and per-adapter tuning.

use std::path::PathBuf;

use {secrecy::Secret, serde::Deserialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    pub server: ServerConfig,
    pub mail: MailConfig,
    pub twilio: TwilioConfig,
    pub whatsapp: WhatsAppConfig,
    pub instagram: InstagramConfig,
    pub ssh: SshConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

/// SMTP account and relay.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Sender address, also the SMTP login (`GMAIL_ADDRESS`).
    pub address: Option<String>,
    /// App password for the account (`GMAIL_APP_PASSWORD`).
    pub app_password: Option<Secret<String>>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub timeout_secs: u64,
    /// How many recipients of a bulk send are in flight at once.
    pub bulk_concurrency: usize,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            address: None,
            app_password: None,
            smtp_host: "smtp.gmail.com".into(),
            smtp_port: 587,
            timeout_secs: 30,
            bulk_concurrency: 1,
        }
    }
}

/// Carrier account used for SMS, voice and the WhatsApp channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<Secret<String>>,
    /// Sender number in E.164 form.
    pub phone_number: Option<String>,
    pub api_base: String,
    /// TwiML instructions fetched by the carrier when a call connects.
    pub voice_url: String,
    pub timeout_secs: u64,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            phone_number: None,
            api_base: "https://api.twilio.com".into(),
            voice_url: "http://demo.twilio.com/docs/voice.xml".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Fixed destination for `/api/send_whatsapp` (`WHATSAPP_NUMBER`).
    pub number: Option<String>,
    /// Append-only log of every WhatsApp attempt.
    pub log_path: PathBuf,
    pub web: WhatsAppWebConfig,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            number: None,
            log_path: PathBuf::from("whatsapp_log.txt"),
            web: WhatsAppWebConfig::default(),
        }
    }
}

/// Desktop browser automation for WhatsApp Web.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhatsAppWebConfig {
    /// Force the path on or off. Unset means: detect a graphical session.
    pub enabled: Option<bool>,
    pub base_url: String,
    /// Seconds to let the chat page load before submitting.
    pub wait_time_secs: u64,
    pub close_tab: bool,
    pub close_time_secs: u64,
    /// Page-load wait and close delay used by scheduled sends.
    pub scheduled_wait_time_secs: u64,
    pub scheduled_close_time_secs: u64,
    /// Program + args that press Enter in the focused window.
    pub submit_command: Option<Vec<String>>,
    /// Program + args that close the focused browser tab.
    pub close_command: Option<Vec<String>>,
}

impl Default for WhatsAppWebConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            base_url: "https://web.whatsapp.com".into(),
            wait_time_secs: 20,
            close_tab: true,
            close_time_secs: 5,
            scheduled_wait_time_secs: 15,
            scheduled_close_time_secs: 3,
            submit_command: None,
            close_command: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstagramConfig {
    pub api_base: String,
    pub app_id: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://i.instagram.com".into(),
            app_id: "567067343352427".into(),
            user_agent: "Instagram 269.0.0.18.75 Android (26/8.0.0; 480dpi; 1080x1920; \
                         OnePlus; 6T Dev; devitron; qcom; en_US; 314665256)"
                .into(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub port: u16,
    pub connect_timeout_secs: u64,
    pub max_output_bytes: usize,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            port: 22,
            connect_timeout_secs: 10,
            max_output_bytes: 200 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    #[test]
    fn defaults_match_documented_values() {
        let cfg = SwitchboardConfig::default();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(cfg.mail.smtp_port, 587);
        assert_eq!(cfg.ssh.connect_timeout_secs, 10);
        assert_eq!(cfg.twilio.voice_url, "http://demo.twilio.com/docs/voice.xml");
        assert!(cfg.whatsapp.web.enabled.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: SwitchboardConfig = toml::from_str(
            r#"
            [mail]
            address = "ops@example.com"
            app_password = "abcd efgh"

            [ssh]
            connect_timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mail.address.as_deref(), Some("ops@example.com"));
        assert_eq!(
            cfg.mail.app_password.as_ref().unwrap().expose_secret(),
            "abcd efgh"
        );
        assert_eq!(cfg.mail.smtp_port, 587);
        assert_eq!(cfg.ssh.connect_timeout_secs, 3);
        assert_eq!(cfg.ssh.port, 22);
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg: SwitchboardConfig =
            toml::from_str("[twilio]\nauth_token = \"tok-very-secret\"").unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("tok-very-secret"));
    }
}
