use std::{path::PathBuf, sync::Arc};

use {
    async_trait::async_trait,
    switchboard_common::Result,
    tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex},
    tracing::{debug, warn},
};

use crate::plugin::{ChannelOutbound, Delivery};

/// Append-only plaintext record of outbound message attempts.
///
/// One line per attempt:
/// `<timestamp> | To: <number> | Message: <text> | Status: <status>`.
/// The service never reads it back.
#[derive(Debug, Clone)]
pub struct MessageLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl MessageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Format a single log line (without trailing newline).
    pub fn format_entry(timestamp: &str, to: &str, message: &str, status: &str) -> String {
        // Keep one entry per line even for multi-line messages.
        let message = message.replace(['\r', '\n'], " ");
        let status = status.replace(['\r', '\n'], " ");
        format!("{timestamp} | To: {to} | Message: {message} | Status: {status}")
    }

    /// Append an entry. Failures are logged, never propagated.
    pub async fn append(&self, to: &str, message: &str, status: &str) {
        let timestamp = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S%.6f")
            .to_string();
        let mut line = Self::format_entry(&timestamp, to, message, status);
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let result = async {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            file.write_all(line.as_bytes()).await?;
            file.flush().await
        }
        .await;

        match result {
            Ok(()) => debug!(path = %self.path.display(), "message log appended"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to append message log"),
        }
    }
}

/// Decorator that records every attempt made through the wrapped channel.
pub struct LoggedChannel<C> {
    inner: C,
    log: MessageLog,
}

impl<C: ChannelOutbound> LoggedChannel<C> {
    pub fn new(inner: C, log: MessageLog) -> Self {
        Self { inner, log }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ChannelOutbound> ChannelOutbound for LoggedChannel<C> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<Delivery> {
        let result = self.inner.send_text(to, text).await;
        let status = match &result {
            Ok(delivery) => delivery.status.clone(),
            Err(e) => format!("Error: {e}"),
        };
        self.log.append(to, text, &status).await;
        result
    }
}
