use std::{sync::Arc, time::Duration};

use {
    async_trait::async_trait,
    chrono::Timelike,
    switchboard_channels::{ChannelOutbound, Delivery},
    switchboard_common::{Error, ErrorKind, Result},
    switchboard_config::schema::WhatsAppWebConfig,
    tracing::{info, warn},
};

use crate::{
    launcher::{DesktopLauncher, Launcher},
    schedule::{delay_until, format_hm, next_minute},
};

/// How long to let the chat load and how long to wait before closing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timing {
    wait: Duration,
    close: Duration,
}

/// Sends messages by opening a prefilled WhatsApp Web chat and pressing
/// Enter once the page has loaded.
pub struct WhatsAppWeb {
    launcher: Arc<dyn Launcher>,
    base_url: String,
    instant: Timing,
    scheduled: Timing,
    close_tab: bool,
}

impl std::fmt::Debug for WhatsAppWeb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppWeb")
            .field("base_url", &self.base_url)
            .field("instant", &self.instant)
            .field("scheduled", &self.scheduled)
            .field("close_tab", &self.close_tab)
            .finish_non_exhaustive()
    }
}

impl WhatsAppWeb {
    pub fn from_config(config: &WhatsAppWebConfig) -> Self {
        Self::with_launcher(Arc::new(DesktopLauncher::from_config(config)), config)
    }

    pub fn with_launcher(launcher: Arc<dyn Launcher>, config: &WhatsAppWebConfig) -> Self {
        Self {
            launcher,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            instant: Timing {
                wait: Duration::from_secs(config.wait_time_secs),
                close: Duration::from_secs(config.close_time_secs),
            },
            scheduled: Timing {
                wait: Duration::from_secs(config.scheduled_wait_time_secs),
                close: Duration::from_secs(config.scheduled_close_time_secs),
            },
            close_tab: config.close_tab,
        }
    }

    pub fn chat_url(&self, to: &str, message: &str) -> Result<String> {
        let digits: String = to.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(Error::invalid(format!("invalid phone number: '{to}'")));
        }
        Ok(format!(
            "{}/send?phone={digits}&text={}",
            self.base_url,
            urlencoding::encode(message)
        ))
    }

    /// Send right away, falling back to the next minute if that fails.
    pub async fn send_instant(&self, to: &str, message: &str) -> Result<Delivery> {
        match self.deliver_now(to, message, self.instant).await {
            Ok(()) => {
                info!(to, "whatsapp web message sent instantly");
                Ok(Delivery::new("Message sent instantly via WhatsApp Web"))
            },
            Err(e) if e.kind() == ErrorKind::InvalidRequest => Err(e),
            Err(e) => {
                warn!(to, error = %e, "instant send failed, scheduling for next minute");
                self.send_scheduled(to, message).await?;
                Ok(Delivery::new("Message scheduled and sent via WhatsApp Web"))
            },
        }
    }

    /// Send at the start of the next wall-clock minute.
    pub async fn send_scheduled(&self, to: &str, message: &str) -> Result<Delivery> {
        // Reject bad numbers before sleeping.
        self.chat_url(to, message)?;

        let now = chrono::Local::now().time();
        let target = next_minute(now.hour(), now.minute());
        let delay = delay_until(now, target, self.scheduled.wait);
        info!(to, at = %format_hm(target), delay_secs = delay.as_secs(), "whatsapp web send scheduled");

        tokio::time::sleep(delay).await;
        self.deliver_now(to, message, self.scheduled).await?;
        Ok(Delivery::new(format!(
            "Message sent via WhatsApp Web (scheduled for {})",
            format_hm(target)
        )))
    }

    async fn deliver_now(&self, to: &str, message: &str, timing: Timing) -> Result<()> {
        let url = self.chat_url(to, message)?;
        self.launcher.open_url(&url).await?;
        tokio::time::sleep(timing.wait).await;
        self.launcher.submit().await?;

        if self.close_tab {
            tokio::time::sleep(timing.close).await;
            if let Err(e) = self.launcher.close_tab().await {
                warn!(error = %e, "could not close whatsapp tab");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebMode {
    Instant,
    Scheduled,
}

/// [`WhatsAppWeb`] in a fixed mode, as a channel.
#[derive(Debug, Clone)]
pub struct WebChannel {
    web: Arc<WhatsAppWeb>,
    mode: WebMode,
}

impl WebChannel {
    pub fn new(web: Arc<WhatsAppWeb>, mode: WebMode) -> Self {
        Self { web, mode }
    }
}

#[async_trait]
impl ChannelOutbound for WebChannel {
    fn id(&self) -> &str {
        "whatsapp-web"
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<Delivery> {
        match self.mode {
            WebMode::Instant => self.web.send_instant(to, text).await,
            WebMode::Scheduled => self.web.send_scheduled(to, text).await,
        }
    }
}
