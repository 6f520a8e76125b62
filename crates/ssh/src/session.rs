use std::{
    io::{self, Read},
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use {
    secrecy::ExposeSecret,
    ssh2::Session,
    switchboard_common::{Error, Result},
    tracing::debug,
};

use crate::{auth::SshAuth, executor::CommandOutput};

const PROVIDER: &str = "ssh";

/// Opens authenticated shells. Implementations block.
pub trait Connector: Send + Sync {
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        auth: &SshAuth,
        timeout: Duration,
    ) -> Result<Box<dyn RemoteShell>>;
}

/// A live connection that can run commands one after another.
pub trait RemoteShell: Send {
    /// Buffers at most `max_output + 1` bytes of each stream; the rest is
    /// read and discarded.
    fn exec(&mut self, command: &str, max_output: usize) -> Result<CommandOutput>;
}

/// `libssh2` backed connector. Host keys are accepted without pinning.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ssh2Connector;

impl Connector for Ssh2Connector {
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        auth: &SshAuth,
        timeout: Duration,
    ) -> Result<Box<dyn RemoteShell>> {
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| Error::transport(PROVIDER, format!("cannot resolve {host}: {e}")))?
            .next()
            .ok_or_else(|| Error::transport(PROVIDER, format!("no address for {host}")))?;

        let tcp = TcpStream::connect_timeout(&addr, timeout)
            .map_err(|e| Error::transport(PROVIDER, format!("connect {addr}: {e}")))?;

        let mut session = Session::new().map_err(|e| Error::transport(PROVIDER, e))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        session
            .handshake()
            .map_err(|e| Error::transport(PROVIDER, format!("handshake: {e}")))?;

        match auth {
            SshAuth::Password(password) => {
                session.userauth_password(username, password.expose_secret())
            },
            SshAuth::Key { path, .. } => session.userauth_pubkey_file(username, None, path, None),
        }
        .map_err(|e| Error::transport(PROVIDER, format!("authentication failed: {e}")))?;

        if !session.authenticated() {
            return Err(Error::transport(PROVIDER, "authentication failed"));
        }
        // Command runtime is unbounded once connected.
        session.set_timeout(0);
        debug!(host, port, username, "ssh session established");
        Ok(Box::new(Ssh2Shell { session }))
    }
}

struct Ssh2Shell {
    session: Session,
}

impl RemoteShell for Ssh2Shell {
    fn exec(&mut self, command: &str, max_output: usize) -> Result<CommandOutput> {
        let mut channel = self
            .session
            .channel_session()
            .map_err(|e| Error::transport(PROVIDER, e))?;
        channel
            .exec(command)
            .map_err(|e| Error::transport(PROVIDER, e))?;

        let stdout =
            read_capped(&mut channel, max_output).map_err(|e| Error::transport(PROVIDER, e))?;
        let stderr = read_capped(&mut channel.stderr(), max_output)
            .map_err(|e| Error::transport(PROVIDER, e))?;
        channel
            .wait_close()
            .map_err(|e| Error::transport(PROVIDER, e))?;

        Ok(CommandOutput {
            output: String::from_utf8_lossy(&stdout).into_owned(),
            error: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code: channel.exit_status().ok(),
        })
    }
}

/// Keeps the first `max + 1` bytes and drains the rest of the stream.
fn read_capped(reader: &mut impl Read, max: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.by_ref().take((max as u64).saturating_add(1)).read_to_end(&mut buf)?;
    io::copy(reader, &mut io::sink())?;
    Ok(buf)
}

impl Drop for Ssh2Shell {
    fn drop(&mut self) {
        let _ = self.session.disconnect(None, "bye", None);
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::io::Cursor};

    #[test]
    fn read_capped_keeps_one_byte_past_the_limit() {
        let mut reader = Cursor::new(vec![b'x'; 10_000]);
        let buf = read_capped(&mut reader, 100).unwrap();
        assert_eq!(buf.len(), 101);
        // The rest was consumed, not left on the stream.
        assert_eq!(reader.position(), 10_000);
    }

    #[test]
    fn read_capped_returns_short_streams_whole() {
        let buf = read_capped(&mut Cursor::new(b"uptime".to_vec()), 100).unwrap();
        assert_eq!(buf, b"uptime");
    }
}
