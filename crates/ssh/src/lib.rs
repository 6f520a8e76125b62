//! Remote command execution over SSH.
//!
//! Authentication is resolved and validated before any network traffic.
//! The `ssh2` session is blocking, so connections and commands run on the
//! blocking thread pool.

pub mod auth;
pub mod executor;
pub mod session;

pub use {
    auth::{KeyKind, SshAuth, resolve_auth},
    executor::{CommandOutput, CommandResult, MAX_COMMANDS, RemoteExecutor, RemoteTarget},
    session::{Connector, RemoteShell, Ssh2Connector},
};
