//! Domain services behind the HTTP routes.
//!
//! Each capability is a trait object so the router is the same whether an
//! adapter is compiled in, missing credentials, or absent entirely. The
//! `Noop*` implementations answer every call with `Unavailable`.

use std::sync::Arc;

use {
    async_trait::async_trait,
    serde::Serialize,
    serde_json::{Value, json},
    switchboard_common::{BatchFailure, BatchReport, Error, Result},
};

use crate::requests::{
    BulkEmail, MakeCall, Newsletter, PostPhoto, RemoteCommand, RemoteCommands, SendEmail,
    SendHtmlEmail, SendSms, SendWhatsApp, SendWhatsAppTo, TemplateEmail,
};

/// Success body of a route, serialized as-is.
pub type ServiceResult<T = Value> = Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Ready,
    MissingCredentials,
    Unavailable,
}

/// `{result, failures}` for batch sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub result: String,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn new(result: String, report: BatchReport) -> Self {
        Self {
            result,
            failures: report.failures,
        }
    }
}

pub fn result_body(result: impl Into<String>) -> Value {
    json!({ "result": result.into() })
}

// ── Traits ──────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TelephonyService: Send + Sync {
    fn status(&self) -> ServiceStatus;
    async fn send_sms(&self, req: SendSms) -> ServiceResult;
    async fn make_call(&self, req: MakeCall) -> ServiceResult;
}

#[async_trait]
pub trait MailService: Send + Sync {
    fn status(&self) -> ServiceStatus;
    async fn send(&self, req: SendEmail) -> ServiceResult;
    async fn send_html(&self, req: SendHtmlEmail) -> ServiceResult;
    async fn send_bulk(&self, req: BulkEmail) -> ServiceResult<BatchSummary>;
    async fn send_template(&self, req: TemplateEmail) -> ServiceResult;
    async fn send_newsletter(&self, req: Newsletter) -> ServiceResult<BatchSummary>;
}

#[async_trait]
pub trait SocialService: Send + Sync {
    fn status(&self) -> ServiceStatus;
    async fn post_photo(&self, req: PostPhoto) -> ServiceResult;
}

#[async_trait]
pub trait RemoteService: Send + Sync {
    fn status(&self) -> ServiceStatus;
    /// `{output, error, exit_code}`
    async fn run(&self, req: RemoteCommand) -> ServiceResult;
    /// `{results: [{command, output, error}]}`
    async fn run_many(&self, req: RemoteCommands) -> ServiceResult;
}

#[async_trait]
pub trait WhatsAppService: Send + Sync {
    fn status(&self) -> ServiceStatus;
    /// WhatsApp Web, scheduled, to the configured default number.
    async fn send_default(&self, req: SendWhatsApp) -> ServiceResult;
    async fn send_twilio(&self, req: SendWhatsAppTo) -> ServiceResult;
    /// WhatsApp Web, immediately, with scheduled fallback.
    async fn send_instant(&self, req: SendWhatsAppTo) -> ServiceResult;
}

// ── Noop implementations ────────────────────────────────────────────────────

pub struct NoopTelephonyService;

#[async_trait]
impl TelephonyService for NoopTelephonyService {
    fn status(&self) -> ServiceStatus {
        ServiceStatus::Unavailable
    }

    async fn send_sms(&self, _req: SendSms) -> ServiceResult {
        Err(Error::unavailable("SMS"))
    }

    async fn make_call(&self, _req: MakeCall) -> ServiceResult {
        Err(Error::unavailable("Voice call"))
    }
}

pub struct NoopMailService;

#[async_trait]
impl MailService for NoopMailService {
    fn status(&self) -> ServiceStatus {
        ServiceStatus::Unavailable
    }

    async fn send(&self, _req: SendEmail) -> ServiceResult {
        Err(Error::unavailable("Email"))
    }

    async fn send_html(&self, _req: SendHtmlEmail) -> ServiceResult {
        Err(Error::unavailable("Email"))
    }

    async fn send_bulk(&self, _req: BulkEmail) -> ServiceResult<BatchSummary> {
        Err(Error::unavailable("Email"))
    }

    async fn send_template(&self, _req: TemplateEmail) -> ServiceResult {
        Err(Error::unavailable("Email"))
    }

    async fn send_newsletter(&self, _req: Newsletter) -> ServiceResult<BatchSummary> {
        Err(Error::unavailable("Email"))
    }
}

pub struct NoopSocialService;

#[async_trait]
impl SocialService for NoopSocialService {
    fn status(&self) -> ServiceStatus {
        ServiceStatus::Unavailable
    }

    async fn post_photo(&self, _req: PostPhoto) -> ServiceResult {
        Err(Error::unavailable("Instagram"))
    }
}

pub struct NoopRemoteService;

#[async_trait]
impl RemoteService for NoopRemoteService {
    fn status(&self) -> ServiceStatus {
        ServiceStatus::Unavailable
    }

    async fn run(&self, _req: RemoteCommand) -> ServiceResult {
        Err(Error::unavailable("Remote command"))
    }

    async fn run_many(&self, _req: RemoteCommands) -> ServiceResult {
        Err(Error::unavailable("Remote command"))
    }
}

pub struct NoopWhatsAppService;

#[async_trait]
impl WhatsAppService for NoopWhatsAppService {
    fn status(&self) -> ServiceStatus {
        ServiceStatus::Unavailable
    }

    async fn send_default(&self, _req: SendWhatsApp) -> ServiceResult {
        Err(Error::unavailable("WhatsApp"))
    }

    async fn send_twilio(&self, _req: SendWhatsAppTo) -> ServiceResult {
        Err(Error::unavailable("WhatsApp"))
    }

    async fn send_instant(&self, _req: SendWhatsAppTo) -> ServiceResult {
        Err(Error::unavailable("WhatsApp"))
    }
}

// ── Bundle ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GatewayServices {
    pub telephony: Arc<dyn TelephonyService>,
    pub mail: Arc<dyn MailService>,
    pub social: Arc<dyn SocialService>,
    pub remote: Arc<dyn RemoteService>,
    pub whatsapp: Arc<dyn WhatsAppService>,
}

impl GatewayServices {
    pub fn noop() -> Self {
        Self {
            telephony: Arc::new(NoopTelephonyService),
            mail: Arc::new(NoopMailService),
            social: Arc::new(NoopSocialService),
            remote: Arc::new(NoopRemoteService),
            whatsapp: Arc::new(NoopWhatsAppService),
        }
    }

    pub fn with_telephony(mut self, service: Arc<dyn TelephonyService>) -> Self {
        self.telephony = service;
        self
    }

    pub fn with_mail(mut self, service: Arc<dyn MailService>) -> Self {
        self.mail = service;
        self
    }

    pub fn with_social(mut self, service: Arc<dyn SocialService>) -> Self {
        self.social = service;
        self
    }

    pub fn with_remote(mut self, service: Arc<dyn RemoteService>) -> Self {
        self.remote = service;
        self
    }

    pub fn with_whatsapp(mut self, service: Arc<dyn WhatsAppService>) -> Self {
        self.whatsapp = service;
        self
    }

    /// Per-capability readiness, as reported on `GET /`.
    pub fn statuses(&self) -> Value {
        json!({
            "sms": self.telephony.status(),
            "mail": self.mail.status(),
            "instagram": self.social.status(),
            "remote": self.remote.status(),
            "whatsapp": self.whatsapp.status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, switchboard_common::ErrorKind};

    #[tokio::test]
    async fn noop_services_are_unavailable() {
        let services = GatewayServices::noop();
        let err = services
            .telephony
            .make_call(MakeCall {
                to_number: "+1".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(err.to_string(), "Voice call service not available");
        assert_eq!(services.statuses()["mail"], "unavailable");
    }
}
