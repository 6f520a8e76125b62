//! WhatsApp delivery.
//!
//! Two independent paths: driving WhatsApp Web in the desktop browser, and
//! the carrier's WhatsApp channel. Both are plain [`ChannelOutbound`]s so the
//! caller can wrap them in a [`LoggedChannel`].
//!
//! [`ChannelOutbound`]: switchboard_channels::ChannelOutbound
//! [`LoggedChannel`]: switchboard_channels::LoggedChannel

pub mod launcher;
pub mod schedule;
pub mod twilio;
pub mod web;

pub use {
    launcher::{DesktopLauncher, Launcher, display_available},
    twilio::TwilioWhatsApp,
    web::{WebChannel, WebMode, WhatsAppWeb},
};
