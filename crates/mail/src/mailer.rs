use std::{path::PathBuf, sync::Arc, time::Duration};

use {
    futures::{StreamExt, stream},
    lettre::message::Mailbox,
    switchboard_common::{BatchReport, Error, Recipients, Result},
    switchboard_config::schema::MailConfig,
    tracing::{info, warn},
};

use crate::{
    message::{Body, OutgoingEmail},
    newsletter::newsletter_html,
    templates::{TemplateData, render_template},
    transport::{MailTransport, SmtpRelay},
};

/// Sends mail from one authenticated account.
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
    from: Mailbox,
    bulk_concurrency: usize,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("from", &self.from.to_string())
            .field("bulk_concurrency", &self.bulk_concurrency)
            .finish_non_exhaustive()
    }
}

impl Mailer {
    /// Resolve credentials and set up the SMTP relay.
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let creds = config.credentials()?;
        let relay = SmtpRelay::new(
            config.smtp_host.clone(),
            config.smtp_port,
            creds.address.clone(),
            creds.app_password,
            Duration::from_secs(config.timeout_secs),
        )?;
        let from = creds
            .address
            .parse()
            .map_err(|e| Error::config(format!("invalid sender address '{}': {e}", creds.address)))?;
        Ok(Self::new(Arc::new(relay), from).with_bulk_concurrency(config.bulk_concurrency))
    }

    pub fn new(transport: Arc<dyn MailTransport>, from: Mailbox) -> Self {
        Self {
            transport,
            from,
            bulk_concurrency: 1,
        }
    }

    pub fn with_bulk_concurrency(mut self, n: usize) -> Self {
        self.bulk_concurrency = n.max(1);
        self
    }

    /// Send one message to every listed recipient in a single envelope.
    pub async fn send(&self, email: OutgoingEmail) -> Result<String> {
        let message = email.build(&self.from).await?;
        self.transport.deliver(message).await?;
        let to = email.to.join(", ");
        info!(to = %to, subject = %email.subject, "email sent");
        Ok(format!("Email sent successfully to {to}"))
    }

    pub async fn send_html(
        &self,
        to: Recipients,
        subject: &str,
        html: &str,
        attachments: Vec<PathBuf>,
    ) -> Result<String> {
        self.send(OutgoingEmail::new(to, subject, Body::Html(html.into())).with_attachments(attachments))
            .await
    }

    pub async fn send_template(
        &self,
        to: Recipients,
        template_name: &str,
        data: &TemplateData,
        attachments: Vec<PathBuf>,
    ) -> Result<String> {
        let rendered = render_template(template_name, data)?;
        self.send_html(to, &rendered.subject, &rendered.html, attachments)
            .await
    }

    /// One message per recipient. Failures are collected, never fatal.
    pub async fn send_bulk(&self, recipients: Vec<String>, subject: &str, body: Body) -> BatchReport {
        let emails = recipients
            .into_iter()
            .map(|to| OutgoingEmail::new(Recipients::One(to), subject, body.clone()))
            .collect();
        self.dispatch(emails, "bulk email").await
    }

    pub async fn send_newsletter(
        &self,
        subscribers: Vec<String>,
        title: &str,
        content: &str,
        attachments: Vec<PathBuf>,
    ) -> BatchReport {
        let html = newsletter_html(title, content, chrono::Local::now().date_naive());
        let emails = subscribers
            .into_iter()
            .map(|to| {
                OutgoingEmail::new(Recipients::One(to), title, Body::Html(html.clone()))
                    .with_attachments(attachments.clone())
            })
            .collect();
        self.dispatch(emails, "newsletter").await
    }

    async fn dispatch(&self, emails: Vec<OutgoingEmail>, kind: &str) -> BatchReport {
        let outcomes: Vec<_> = stream::iter(emails)
            .map(|email| async move {
                let target = email.to.join(", ");
                (target, self.send(email).await)
            })
            .buffered(self.bulk_concurrency)
            .collect()
            .await;

        let mut report = BatchReport::default();
        for (target, outcome) in outcomes {
            match outcome {
                Ok(_) => report.record_success(),
                Err(e) => {
                    warn!(%target, error = %e, "{kind} delivery failed");
                    report.record_failure(target, e);
                },
            }
        }
        report
    }
}

pub fn bulk_summary(report: &BatchReport) -> String {
    format!(
        "Bulk email completed: {} sent, {} failed",
        report.succeeded,
        report.failed()
    )
}

pub fn newsletter_summary(report: &BatchReport) -> String {
    format!(
        "Newsletter sent: {} delivered, {} failed",
        report.succeeded,
        report.failed()
    )
}
