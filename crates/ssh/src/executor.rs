use std::{sync::Arc, time::Duration};

use {
    serde::Serialize,
    switchboard_common::{Error, Result},
    switchboard_config::schema::SshConfig,
    tracing::{info, warn},
};

use crate::{
    auth::SshAuth,
    session::{Connector, RemoteShell, Ssh2Connector},
};

/// Upper bound on commands per batch request.
pub const MAX_COMMANDS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub output: String,
    pub error: String,
    pub exit_code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub command: String,
    pub output: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct RemoteTarget {
    pub host: String,
    pub username: String,
    pub port: Option<u16>,
}

#[derive(Clone)]
pub struct RemoteExecutor {
    connector: Arc<dyn Connector>,
    default_port: u16,
    connect_timeout: Duration,
    max_output_bytes: usize,
}

impl std::fmt::Debug for RemoteExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteExecutor")
            .field("default_port", &self.default_port)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_output_bytes", &self.max_output_bytes)
            .finish_non_exhaustive()
    }
}

impl RemoteExecutor {
    pub fn from_config(config: &SshConfig) -> Self {
        Self::with_connector(Arc::new(Ssh2Connector), config)
    }

    pub fn with_connector(connector: Arc<dyn Connector>, config: &SshConfig) -> Self {
        Self {
            connector,
            default_port: config.port,
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            max_output_bytes: config.max_output_bytes,
        }
    }

    /// Run one command on a fresh connection.
    pub async fn run(&self, target: RemoteTarget, auth: SshAuth, command: String) -> Result<CommandOutput> {
        let max = self.max_output_bytes;
        self.with_shell(target, auth, move |shell| {
            let mut out = shell.exec(&command, max)?;
            truncate(&mut out.output, max);
            truncate(&mut out.error, max);
            Ok(out)
        })
        .await
    }

    /// Run up to [`MAX_COMMANDS`] commands sequentially over one connection.
    ///
    /// A failing command is recorded in its own result; the rest still run.
    pub async fn run_many(
        &self,
        target: RemoteTarget,
        auth: SshAuth,
        commands: Vec<String>,
    ) -> Result<Vec<CommandResult>> {
        if commands.len() > MAX_COMMANDS {
            return Err(Error::invalid(format!(
                "Too many commands (max {MAX_COMMANDS} allowed)"
            )));
        }
        let max = self.max_output_bytes;
        self.with_shell(target, auth, move |shell| {
            let results = commands
                .into_iter()
                .map(|command| match shell.exec(&command, max) {
                    Ok(mut out) => {
                        truncate(&mut out.output, max);
                        truncate(&mut out.error, max);
                        CommandResult {
                            command,
                            output: out.output,
                            error: out.error,
                        }
                    },
                    Err(e) => {
                        warn!(%command, error = %e, "remote command failed");
                        CommandResult {
                            command,
                            output: String::new(),
                            error: format!("Error: {e}"),
                        }
                    },
                })
                .collect();
            Ok(results)
        })
        .await
    }

    async fn with_shell<T, F>(&self, target: RemoteTarget, auth: SshAuth, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn RemoteShell) -> Result<T> + Send + 'static,
    {
        let connector = Arc::clone(&self.connector);
        let port = target.port.unwrap_or(self.default_port);
        let timeout = self.connect_timeout;

        tokio::task::spawn_blocking(move || {
            let mut shell =
                connector.connect(&target.host, port, &target.username, &auth, timeout)?;
            info!(host = %target.host, port, username = %target.username, "ssh connected");
            work(shell.as_mut())
        })
        .await
        .map_err(|e| Error::transport("ssh", format!("worker failed: {e}")))?
    }
}

fn truncate(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text.push_str("\n... [output truncated]");
}
