//! Photo posting through the Instagram mobile API.
//!
//! Each post logs in from scratch, uploads the image bytes and then
//! configures the upload as a feed post with the caption.

pub mod client;
pub mod photo;
pub mod poster;

pub use {
    client::{InstagramClient, Session},
    photo::Photo,
    poster::InstagramPoster,
};
