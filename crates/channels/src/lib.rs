//! Outbound messaging seam.
//!
//! Each text channel (Twilio SMS, Twilio WhatsApp, WhatsApp Web) implements
//! [`ChannelOutbound`]. [`LoggedChannel`] wraps any of them and records every
//! attempt in the append-only [`MessageLog`].

pub mod log;
pub mod plugin;

pub use {
    log::{LoggedChannel, MessageLog},
    plugin::{ChannelOutbound, Delivery},
};
