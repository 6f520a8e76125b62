use std::path::{Path, PathBuf};

use {
    lettre::{
        Message,
        message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    },
    switchboard_common::{Error, Recipients, Result},
    tracing::warn,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Plain(String),
    Html(String),
}

impl Body {
    pub fn new(text: impl Into<String>, is_html: bool) -> Self {
        if is_html {
            Self::Html(text.into())
        } else {
            Self::Plain(text.into())
        }
    }
}

/// A message before it is turned into MIME.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: Body,
    pub attachments: Vec<PathBuf>,
}

impl OutgoingEmail {
    pub fn new(to: Recipients, subject: impl Into<String>, body: Body) -> Self {
        Self {
            to: to.into_vec(),
            subject: subject.into(),
            body,
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<PathBuf>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Build the MIME message. Attachment paths that cannot be read are
    /// skipped with a warning.
    pub async fn build(&self, from: &Mailbox) -> Result<Message> {
        if self.to.is_empty() {
            return Err(Error::invalid("at least one recipient is required"));
        }

        let mut builder = Message::builder()
            .from(from.clone())
            .subject(self.subject.clone());
        for addr in &self.to {
            let mailbox: Mailbox = addr
                .trim()
                .parse()
                .map_err(|e| Error::invalid(format!("invalid recipient '{addr}': {e}")))?;
            builder = builder.to(mailbox);
        }

        let body = match &self.body {
            Body::Plain(text) => SinglePart::plain(text.clone()),
            Body::Html(html) => SinglePart::html(html.clone()),
        };
        let mut parts = MultiPart::mixed().singlepart(body);

        for path in &self.attachments {
            match tokio::fs::read(path).await {
                Ok(bytes) => parts = parts.singlepart(attachment(path, bytes)?),
                Err(e) => warn!(path = %path.display(), error = %e, "attachment not found, skipping"),
            }
        }

        builder
            .multipart(parts)
            .map_err(|e| Error::invalid(format!("could not build email: {e}")))
    }
}

fn attachment(path: &Path, bytes: Vec<u8>) -> Result<SinglePart> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".into());
    let content_type = ContentType::parse("application/octet-stream")
        .map_err(|e| Error::invalid(format!("bad content type: {e}")))?;
    Ok(Attachment::new(filename).body(bytes, content_type))
}
