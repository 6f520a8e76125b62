//! Shared types for every switchboard crate: the error taxonomy surfaced at
//! the HTTP boundary, recipient lists and the report produced by batch
//! operations.

pub mod error;
pub mod types;

pub use {
    error::{Error, ErrorKind, Result},
    types::{BatchFailure, BatchReport, Recipients},
};
