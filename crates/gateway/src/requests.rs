//! Typed request bodies for every `/api/*` route.
//!
//! Field names match the JSON the dashboard sends. Absent fields fail
//! deserialization; present-but-blank ones fail [`Validate`].

use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    serde_json::{Map, Value},
    switchboard_common::{Error, Recipients, Result},
};

/// Upper bound on commands per `/api/remote_commands` call.
pub const MAX_REMOTE_COMMANDS: usize = 50;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("'{field}' must not be empty")));
    }
    Ok(())
}

fn require_list(field: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::invalid(format!("'{field}' must list at least one address")));
    }
    values.iter().try_for_each(|v| require(field, v))
}

// ── Telephony ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct SendSms {
    pub to_number: String,
    pub message: String,
}

impl Validate for SendSms {
    fn validate(&self) -> Result<()> {
        require("to_number", &self.to_number)?;
        require("message", &self.message)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MakeCall {
    pub to_number: String,
}

impl Validate for MakeCall {
    fn validate(&self) -> Result<()> {
        require("to_number", &self.to_number)
    }
}

// ── Instagram ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct PostPhoto {
    pub username: String,
    pub password: Secret<String>,
    pub image_path: PathBuf,
    pub caption: String,
}

impl Validate for PostPhoto {
    fn validate(&self) -> Result<()> {
        require("username", &self.username)?;
        require("password", self.password.expose_secret())?;
        require("image_path", &self.image_path.to_string_lossy())
    }
}

// ── Remote execution ────────────────────────────────────────────────────────

/// Where to connect and how to authenticate.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteLogin {
    pub ip: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<Secret<String>>,
    #[serde(default)]
    pub key_path: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

impl Validate for RemoteLogin {
    fn validate(&self) -> Result<()> {
        require("ip", &self.ip)?;
        require("username", &self.username)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCommand {
    #[serde(flatten)]
    pub login: RemoteLogin,
    pub command: String,
}

impl Validate for RemoteCommand {
    fn validate(&self) -> Result<()> {
        self.login.validate()?;
        require("command", &self.command)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCommands {
    #[serde(flatten)]
    pub login: RemoteLogin,
    pub commands: Vec<String>,
}

impl Validate for RemoteCommands {
    fn validate(&self) -> Result<()> {
        self.login.validate()?;
        if self.commands.len() > MAX_REMOTE_COMMANDS {
            return Err(Error::invalid(format!(
                "Too many commands (max {MAX_REMOTE_COMMANDS} allowed)"
            )));
        }
        Ok(())
    }
}

// ── WhatsApp ────────────────────────────────────────────────────────────────

/// Message to the configured default number.
#[derive(Debug, Clone, Deserialize)]
pub struct SendWhatsApp {
    pub message: String,
}

impl Validate for SendWhatsApp {
    fn validate(&self) -> Result<()> {
        require("message", &self.message)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendWhatsAppTo {
    pub to_number: String,
    pub message: String,
}

impl Validate for SendWhatsAppTo {
    fn validate(&self) -> Result<()> {
        require("to_number", &self.to_number)?;
        require("message", &self.message)
    }
}

// ── Mail ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct SendEmail {
    pub to_email: Recipients,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub is_html: bool,
    #[serde(default)]
    pub attachments: Option<Vec<PathBuf>>,
}

impl Validate for SendEmail {
    fn validate(&self) -> Result<()> {
        require_list("to_email", self.to_email.as_slice())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendHtmlEmail {
    pub to_email: Recipients,
    pub subject: String,
    pub html_content: String,
    #[serde(default)]
    pub attachments: Option<Vec<PathBuf>>,
}

impl Validate for SendHtmlEmail {
    fn validate(&self) -> Result<()> {
        require_list("to_email", self.to_email.as_slice())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkEmail {
    pub recipients_list: Vec<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub is_html: bool,
}

impl Validate for BulkEmail {
    fn validate(&self) -> Result<()> {
        require_list("recipients_list", &self.recipients_list)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateEmail {
    pub to_email: Recipients,
    pub template_name: String,
    pub template_data: Map<String, Value>,
    #[serde(default)]
    pub attachments: Option<Vec<PathBuf>>,
}

impl Validate for TemplateEmail {
    fn validate(&self) -> Result<()> {
        require_list("to_email", self.to_email.as_slice())?;
        require("template_name", &self.template_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Newsletter {
    pub subscribers_list: Vec<String>,
    pub newsletter_title: String,
    pub newsletter_content: String,
    #[serde(default)]
    pub attachments: Option<Vec<PathBuf>>,
}

impl Validate for Newsletter {
    fn validate(&self) -> Result<()> {
        require_list("subscribers_list", &self.subscribers_list)?;
        require("newsletter_title", &self.newsletter_title)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn parse<T: for<'de> Deserialize<'de>>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn blank_fields_rejected() {
        let req: SendSms = parse(json!({ "to_number": "  ", "message": "hi" }));
        assert_eq!(req.validate().unwrap_err().to_string(), "'to_number' must not be empty");
    }

    #[test]
    fn remote_login_is_flattened_and_optional_auth() {
        let req: RemoteCommand = parse(json!({
            "ip": "10.0.0.1",
            "username": "ops",
            "command": "uptime",
            "key_path": "~/.ssh/id_rsa",
            "port": 2222
        }));
        assert!(req.validate().is_ok());
        assert!(req.login.password.is_none());
        assert_eq!(req.login.port, Some(2222));
    }

    #[test]
    fn command_cap_enforced() {
        let commands: Vec<String> = (0..51).map(|i| format!("echo {i}")).collect();
        let req: RemoteCommands = parse(json!({
            "ip": "h", "username": "u", "password": "p", "commands": commands
        }));
        assert!(req.validate().unwrap_err().to_string().contains("max 50"));
    }

    #[test]
    fn to_email_accepts_both_shapes_and_null_attachments() {
        let one: SendEmail = parse(json!({
            "to_email": "a@example.com", "subject": "s", "message": "m", "attachments": null
        }));
        assert_eq!(one.to_email.as_slice(), ["a@example.com"]);
        assert!(!one.is_html);

        let many: SendEmail = parse(json!({
            "to_email": ["a@example.com", "b@example.com"], "subject": "s", "message": "m"
        }));
        assert_eq!(many.to_email.as_slice().len(), 2);

        let empty: SendEmail = parse(json!({ "to_email": [], "subject": "s", "message": "m" }));
        assert!(empty.validate().is_err());
    }
}
