use {async_trait::async_trait, serde::Serialize, switchboard_common::Result};

/// Send text messages over one channel.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    /// Channel identifier (e.g. "sms", "whatsapp-twilio").
    fn id(&self) -> &str;

    async fn send_text(&self, to: &str, text: &str) -> Result<Delivery>;
}

/// What a channel reports after accepting a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    /// Provider-assigned identifier, when the provider hands one back.
    pub id: Option<String>,
    /// Human-readable status returned to the caller.
    pub status: String,
}

impl Delivery {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            id: None,
            status: status.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            status: status.into(),
        }
    }
}

impl std::fmt::Display for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.status)
    }
}
