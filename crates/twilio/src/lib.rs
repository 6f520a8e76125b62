//! Twilio carrier adapter: SMS, voice calls, and the raw REST client reused
//! by the WhatsApp channel.

pub mod account;
pub mod client;

pub use {
    account::{SmsChannel, TwilioAccount},
    client::{CallResource, MessageResource, TwilioClient},
};
