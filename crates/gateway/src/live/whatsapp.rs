use std::sync::Arc;

use {
    async_trait::async_trait,
    switchboard_channels::{ChannelOutbound, LoggedChannel, MessageLog},
    switchboard_common::{Error, Result},
    switchboard_config::SwitchboardConfig,
    switchboard_twilio::TwilioAccount,
    switchboard_whatsapp::{TwilioWhatsApp, WebChannel, WebMode, WhatsAppWeb, display_available},
    tracing::info,
};

use crate::{
    live::Provisioned,
    requests::{SendWhatsApp, SendWhatsAppTo},
    services::{ServiceResult, ServiceStatus, WhatsAppService, result_body},
};

struct WebChannels {
    instant: LoggedChannel<WebChannel>,
    scheduled: LoggedChannel<WebChannel>,
}

impl WebChannels {
    fn new(web: Arc<WhatsAppWeb>, log: &MessageLog) -> Self {
        Self {
            instant: LoggedChannel::new(WebChannel::new(web.clone(), WebMode::Instant), log.clone()),
            scheduled: LoggedChannel::new(WebChannel::new(web, WebMode::Scheduled), log.clone()),
        }
    }
}

/// WhatsApp through the desktop browser and through the carrier.
///
/// Every attempt lands in the message log, including ones rejected for
/// missing credentials or an absent display.
pub struct LiveWhatsAppService {
    twilio: Provisioned<LoggedChannel<TwilioWhatsApp>>,
    web: Option<WebChannels>,
    default_number: Provisioned<String>,
    log: MessageLog,
}

impl LiveWhatsAppService {
    pub fn from_config(config: &SwitchboardConfig) -> Result<Self> {
        let log = MessageLog::new(config.whatsapp.log_path.clone());
        let web_config = &config.whatsapp.web;
        let web = web_config
            .enabled
            .unwrap_or_else(display_available)
            .then(|| Arc::new(WhatsAppWeb::from_config(web_config)));
        if web.is_none() {
            info!("whatsapp web disabled: no graphical session");
        }
        let twilio = Provisioned::resolve(TwilioAccount::from_config(&config.twilio))?;
        let default_number =
            Provisioned::resolve(config.whatsapp.credentials().map(|c| c.number))?;
        Ok(Self::new(twilio, web, default_number, log))
    }

    pub fn new(
        account: Provisioned<TwilioAccount>,
        web: Option<Arc<WhatsAppWeb>>,
        default_number: Provisioned<String>,
        log: MessageLog,
    ) -> Self {
        let twilio = match account {
            Provisioned::Ready(account) => {
                Provisioned::Ready(LoggedChannel::new(TwilioWhatsApp::new(&account), log.clone()))
            },
            Provisioned::Missing(reason) => Provisioned::Missing(reason),
        };
        Self {
            twilio,
            web: web.map(|web| WebChannels::new(web, &log)),
            default_number,
            log,
        }
    }

    async fn reject(&self, to: &str, message: &str, err: Error) -> ServiceResult {
        self.log.append(to, message, &format!("Error: {err}")).await;
        Err(err)
    }

    fn web(&self) -> Result<&WebChannels> {
        self.web
            .as_ref()
            .ok_or_else(|| Error::unavailable("WhatsApp Web"))
    }
}

#[async_trait]
impl WhatsAppService for LiveWhatsAppService {
    fn status(&self) -> ServiceStatus {
        if self.web.is_some() {
            ServiceStatus::Ready
        } else {
            self.twilio.status()
        }
    }

    async fn send_default(&self, req: SendWhatsApp) -> ServiceResult {
        let web = match self.web() {
            Ok(web) => web,
            Err(e) => return self.reject("default", &req.message, e).await,
        };
        let to = match self.default_number.get() {
            Ok(number) => number,
            Err(e) => return self.reject("default", &req.message, e).await,
        };
        let delivery = web.scheduled.send_text(to, &req.message).await?;
        Ok(result_body(delivery.status))
    }

    async fn send_twilio(&self, req: SendWhatsAppTo) -> ServiceResult {
        let channel = match self.twilio.get() {
            Ok(channel) => channel,
            Err(e) => return self.reject(&req.to_number, &req.message, e).await,
        };
        let delivery = channel.send_text(&req.to_number, &req.message).await?;
        Ok(result_body(delivery.status))
    }

    async fn send_instant(&self, req: SendWhatsAppTo) -> ServiceResult {
        let web = match self.web() {
            Ok(web) => web,
            Err(e) => return self.reject(&req.to_number, &req.message, e).await,
        };
        let delivery = web.instant.send_text(&req.to_number, &req.message).await?;
        Ok(result_body(delivery.status))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::sync::Mutex,
        switchboard_common::ErrorKind,
        switchboard_config::schema::WhatsAppWebConfig,
        switchboard_whatsapp::Launcher,
    };

    #[derive(Default)]
    struct Urls(Mutex<Vec<String>>);

    #[async_trait]
    impl Launcher for Urls {
        async fn open_url(&self, url: &str) -> Result<()> {
            self.0.lock().unwrap().push(url.to_string());
            Ok(())
        }

        async fn submit(&self) -> Result<()> {
            Ok(())
        }

        async fn close_tab(&self) -> Result<()> {
            Ok(())
        }
    }

    fn web(launcher: Arc<Urls>) -> Arc<WhatsAppWeb> {
        Arc::new(WhatsAppWeb::with_launcher(launcher, &WhatsAppWebConfig::default()))
    }

    fn log_lines(log: &MessageLog) -> Vec<String> {
        std::fs::read_to_string(log.path())
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn no_display_is_unavailable_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let log = MessageLog::new(dir.path().join("whatsapp_log.txt"));
        let service = LiveWhatsAppService::new(
            Provisioned::Missing("no twilio".into()),
            None,
            Provisioned::Ready("+15550009".into()),
            log.clone(),
        );
        assert_eq!(service.status(), ServiceStatus::MissingCredentials);

        let err = service
            .send_instant(SendWhatsAppTo {
                to_number: "+15550001".into(),
                message: "hi".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(err.to_string(), "WhatsApp Web service not available");

        let lines = log_lines(&log);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Status: Error: WhatsApp Web service not available"));
    }

    #[tokio::test]
    async fn missing_twilio_credentials_are_logged() {
        let dir = tempfile::tempdir().unwrap();
        let log = MessageLog::new(dir.path().join("whatsapp_log.txt"));
        let service = LiveWhatsAppService::new(
            Provisioned::Missing("Twilio credentials not found".into()),
            None,
            Provisioned::Missing("no number".into()),
            log.clone(),
        );
        let err = service
            .send_twilio(SendWhatsAppTo {
                to_number: "+15550001".into(),
                message: "hola".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(log_lines(&log)[0].contains("| To: +15550001 | Message: hola |"));
    }

    #[tokio::test(start_paused = true)]
    async fn default_number_goes_through_scheduled_web() {
        let dir = tempfile::tempdir().unwrap();
        let log = MessageLog::new(dir.path().join("whatsapp_log.txt"));
        let launcher = Arc::new(Urls::default());
        let service = LiveWhatsAppService::new(
            Provisioned::Missing("no twilio".into()),
            Some(web(launcher.clone())),
            Provisioned::Ready("+1 555 0009".into()),
            log.clone(),
        );
        assert_eq!(service.status(), ServiceStatus::Ready);

        let body = service
            .send_default(SendWhatsApp {
                message: "daily".into(),
            })
            .await
            .unwrap();
        assert!(
            body["result"]
                .as_str()
                .unwrap()
                .starts_with("Message sent via WhatsApp Web (scheduled for ")
        );
        assert_eq!(launcher.0.lock().unwrap().as_slice(), [
            "https://web.whatsapp.com/send?phone=15550009&text=daily"
        ]);
        assert_eq!(log_lines(&log).len(), 1);
    }

    #[tokio::test]
    async fn default_number_missing_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = LiveWhatsAppService::new(
            Provisioned::Missing("no twilio".into()),
            Some(web(Arc::new(Urls::default()))),
            Provisioned::Missing(
                "WhatsApp credentials not found in environment variables: WHATSAPP_NUMBER not set"
                    .into(),
            ),
            MessageLog::new(dir.path().join("log.txt")),
        );
        let err = service
            .send_default(SendWhatsApp {
                message: "x".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
