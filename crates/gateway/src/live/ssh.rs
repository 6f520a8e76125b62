use {
    async_trait::async_trait,
    secrecy::ExposeSecret,
    serde_json::json,
    switchboard_common::Result,
    switchboard_config::schema::SshConfig,
    switchboard_ssh::{RemoteExecutor, RemoteTarget, SshAuth, resolve_auth},
};

use crate::{
    requests::{RemoteCommand, RemoteCommands, RemoteLogin},
    services::{RemoteService, ServiceResult, ServiceStatus},
};

pub struct LiveRemoteService {
    executor: RemoteExecutor,
}

impl LiveRemoteService {
    pub fn from_config(config: &SshConfig) -> Self {
        Self::new(RemoteExecutor::from_config(config))
    }

    pub fn new(executor: RemoteExecutor) -> Self {
        Self { executor }
    }
}

/// Resolve auth from the request before anything touches the network.
async fn prepare(login: RemoteLogin) -> Result<(RemoteTarget, SshAuth)> {
    let auth = resolve_auth(
        login.password.as_ref().map(|p| p.expose_secret().as_str()),
        login.key_path.as_deref(),
    )
    .await?;
    let target = RemoteTarget {
        host: login.ip.trim().to_string(),
        username: login.username.trim().to_string(),
        port: login.port,
    };
    Ok((target, auth))
}

#[async_trait]
impl RemoteService for LiveRemoteService {
    fn status(&self) -> ServiceStatus {
        ServiceStatus::Ready
    }

    async fn run(&self, req: RemoteCommand) -> ServiceResult {
        let (target, auth) = prepare(req.login).await?;
        let out = self.executor.run(target, auth, req.command).await?;
        Ok(json!(out))
    }

    async fn run_many(&self, req: RemoteCommands) -> ServiceResult {
        let (target, auth) = prepare(req.login).await?;
        let results = self.executor.run_many(target, auth, req.commands).await?;
        Ok(json!({ "results": results }))
    }
}
