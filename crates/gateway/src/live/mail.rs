use {
    async_trait::async_trait,
    switchboard_common::Result,
    switchboard_config::schema::MailConfig,
    switchboard_mail::{Body, Mailer, OutgoingEmail, Recipients, bulk_summary, newsletter_summary},
};

use crate::{
    live::Provisioned,
    requests::{BulkEmail, Newsletter, SendEmail, SendHtmlEmail, TemplateEmail},
    services::{BatchSummary, MailService, ServiceResult, ServiceStatus, result_body},
};

pub struct LiveMailService {
    mailer: Provisioned<Mailer>,
}

impl LiveMailService {
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        Ok(Self::new(Provisioned::resolve(Mailer::from_config(config))?))
    }

    pub fn new(mailer: Provisioned<Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl MailService for LiveMailService {
    fn status(&self) -> ServiceStatus {
        self.mailer.status()
    }

    async fn send(&self, req: SendEmail) -> ServiceResult {
        let email = OutgoingEmail::new(
            req.to_email,
            req.subject,
            Body::new(req.message, req.is_html),
        )
        .with_attachments(req.attachments.unwrap_or_default());
        Ok(result_body(self.mailer.get()?.send(email).await?))
    }

    async fn send_html(&self, req: SendHtmlEmail) -> ServiceResult {
        let result = self
            .mailer
            .get()?
            .send_html(
                req.to_email,
                &req.subject,
                &req.html_content,
                req.attachments.unwrap_or_default(),
            )
            .await?;
        Ok(result_body(result))
    }

    async fn send_bulk(&self, req: BulkEmail) -> ServiceResult<BatchSummary> {
        let report = self
            .mailer
            .get()?
            .send_bulk(
                req.recipients_list,
                &req.subject,
                Body::new(req.message, req.is_html),
            )
            .await;
        Ok(BatchSummary::new(bulk_summary(&report), report))
    }

    async fn send_template(&self, req: TemplateEmail) -> ServiceResult {
        let result = self
            .mailer
            .get()?
            .send_template(
                req.to_email,
                &req.template_name,
                &req.template_data,
                req.attachments.unwrap_or_default(),
            )
            .await?;
        Ok(result_body(result))
    }

    async fn send_newsletter(&self, req: Newsletter) -> ServiceResult<BatchSummary> {
        let report = self
            .mailer
            .get()?
            .send_newsletter(
                req.subscribers_list,
                &req.newsletter_title,
                &req.newsletter_content,
                req.attachments.unwrap_or_default(),
            )
            .await;
        Ok(BatchSummary::new(newsletter_summary(&report), report))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        switchboard_common::{Error, ErrorKind},
        switchboard_mail::{MailTransport, Message},
    };

    /// Accepts every other message.
    #[derive(Default)]
    struct Alternating {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MailTransport for Alternating {
        async fn deliver(&self, _message: Message) -> Result<()> {
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 1 {
                return Err(Error::transport("smtp", "550 rejected"));
            }
            Ok(())
        }
    }

    fn service() -> LiveMailService {
        let mailer = Mailer::new(Arc::new(Alternating::default()), "me@example.com".parse().unwrap());
        LiveMailService::new(Provisioned::Ready(mailer))
    }

    #[tokio::test]
    async fn bulk_summary_and_failures() {
        let summary = service()
            .send_bulk(BulkEmail {
                recipients_list: (0..4).map(|i| format!("u{i}@example.com")).collect(),
                subject: "s".into(),
                message: "m".into(),
                is_html: false,
            })
            .await
            .unwrap();
        assert_eq!(summary.result, "Bulk email completed: 2 sent, 2 failed");
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].target, "u1@example.com");
    }

    #[tokio::test]
    async fn template_errors_surface_as_invalid_request() {
        let err = service()
            .send_template(TemplateEmail {
                to_email: Recipients::One("a@example.com".into()),
                template_name: "welcome".into(),
                template_data: serde_json::Map::new(),
                attachments: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert_eq!(err.to_string(), "Missing required template data: 'name'");
    }

    #[tokio::test]
    async fn missing_credentials_are_configuration_errors() {
        let service = LiveMailService::from_config(&MailConfig::default()).unwrap();
        assert_eq!(service.status(), ServiceStatus::MissingCredentials);
        let err = service
            .send(SendEmail {
                to_email: Recipients::One("a@example.com".into()),
                subject: "s".into(),
                message: "m".into(),
                is_html: false,
                attachments: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
