use std::{process::Stdio, time::Duration};

use {
    async_trait::async_trait,
    switchboard_common::{Error, Result},
    switchboard_config::schema::WhatsAppWebConfig,
    tokio::process::Command,
    tracing::debug,
};

const PROVIDER: &str = "whatsapp-web";
const KEY_TIMEOUT: Duration = Duration::from_secs(10);

/// Desktop actions needed to drive a browser tab.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn open_url(&self, url: &str) -> Result<()>;
    /// Press Enter in the focused window.
    async fn submit(&self) -> Result<()>;
    async fn close_tab(&self) -> Result<()>;
}

/// Opens URLs in the default browser and sends keystrokes through an
/// external helper (`xdotool`, `osascript` or PowerShell by default).
#[derive(Debug, Clone)]
pub struct DesktopLauncher {
    submit_command: Vec<String>,
    close_command: Vec<String>,
}

impl DesktopLauncher {
    pub fn from_config(config: &WhatsAppWebConfig) -> Self {
        Self {
            submit_command: config
                .submit_command
                .clone()
                .unwrap_or_else(default_submit_command),
            close_command: config
                .close_command
                .clone()
                .unwrap_or_else(default_close_command),
        }
    }
}

#[async_trait]
impl Launcher for DesktopLauncher {
    async fn open_url(&self, url: &str) -> Result<()> {
        let url = url.to_string();
        tokio::task::spawn_blocking(move || open::that_detached(&url))
            .await
            .map_err(|e| Error::transport(PROVIDER, e))?
            .map_err(|e| Error::transport(PROVIDER, format!("could not open browser: {e}")))
    }

    async fn submit(&self) -> Result<()> {
        run_helper(&self.submit_command).await
    }

    async fn close_tab(&self) -> Result<()> {
        run_helper(&self.close_command).await
    }
}

async fn run_helper(argv: &[String]) -> Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| Error::config("empty key helper command"))?;
    debug!(program, ?args, "key helper");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::transport(PROVIDER, format!("{program}: {e}")))?;

    let output = tokio::time::timeout(KEY_TIMEOUT, child.wait_with_output())
        .await
        .map_err(|_| Error::transport(PROVIDER, format!("{program} timed out")))?
        .map_err(|e| Error::transport(PROVIDER, format!("{program}: {e}")))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(Error::transport(
            PROVIDER,
            format!(
                "{program} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ))
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

fn default_submit_command() -> Vec<String> {
    if cfg!(target_os = "macos") {
        argv(&[
            "osascript",
            "-e",
            r#"tell application "System Events" to key code 36"#,
        ])
    } else if cfg!(windows) {
        argv(&[
            "powershell",
            "-NoProfile",
            "-Command",
            "(New-Object -ComObject WScript.Shell).SendKeys('~')",
        ])
    } else {
        argv(&["xdotool", "key", "Return"])
    }
}

fn default_close_command() -> Vec<String> {
    if cfg!(target_os = "macos") {
        argv(&[
            "osascript",
            "-e",
            r#"tell application "System Events" to keystroke "w" using command down"#,
        ])
    } else if cfg!(windows) {
        argv(&[
            "powershell",
            "-NoProfile",
            "-Command",
            "(New-Object -ComObject WScript.Shell).SendKeys('^w')",
        ])
    } else {
        argv(&["xdotool", "key", "ctrl+w"])
    }
}

/// Whether a graphical session is reachable from this process.
pub fn display_available() -> bool {
    display_available_with(|name| std::env::var(name).ok())
}

pub fn display_available_with(lookup: impl Fn(&str) -> Option<String>) -> bool {
    if cfg!(any(target_os = "macos", windows)) {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|name| lookup(name).is_some_and(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_commands_override_defaults() {
        let launcher = DesktopLauncher::from_config(&WhatsAppWebConfig {
            submit_command: Some(vec!["true".into()]),
            ..WhatsAppWebConfig::default()
        });
        assert_eq!(launcher.submit_command, vec!["true"]);
        assert!(!launcher.close_command.is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_display_detection() {
        assert!(!display_available_with(|_| None));
        assert!(!display_available_with(|_| Some(" ".into())));
        assert!(display_available_with(|name| {
            (name == "WAYLAND_DISPLAY").then(|| "wayland-0".into())
        }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn helper_exit_status_is_checked() {
        assert!(run_helper(&argv(&["true"])).await.is_ok());
        let err = run_helper(&argv(&["false"])).await.unwrap_err();
        assert!(err.to_string().contains("false exited with"));
        assert!(run_helper(&[]).await.is_err());
    }
}
