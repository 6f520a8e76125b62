//! Mail adapter: SMTP delivery of plain, HTML, templated, bulk and newsletter
//! messages.
//!
//! Every message opens its own authenticated SMTP session. Bulk sends keep
//! going past individual failures and report counts instead of aborting.

pub mod mailer;
pub mod message;
pub mod newsletter;
pub mod templates;
pub mod transport;

pub use {
    lettre::{Message, message::Mailbox},
    mailer::{Mailer, bulk_summary, newsletter_summary},
    message::{Body, OutgoingEmail},
    switchboard_common::Recipients,
    templates::{Rendered, TemplateData, render_template},
    transport::{MailTransport, SmtpRelay},
};
