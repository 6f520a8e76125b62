//! Gateway: the HTTP surface in front of the provider adapters.
//!
//! Request flow:
//! 1. Extract and validate the typed JSON body (`ApiJson`)
//! 2. Dispatch to the domain service held in `GatewayServices`
//! 3. Map the outcome to `200 {..}`, `400 {error}` or `503 {error}`
//!
//! Adapters are compiled in through Cargo features. A capability that is
//! compiled out, or failed to initialise, keeps its route and answers 503.

pub mod api;
pub mod error;
pub mod extract;
pub mod live;
pub mod requests;
pub mod server;
pub mod services;
pub mod state;
