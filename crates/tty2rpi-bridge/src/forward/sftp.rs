use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use ssh2::Session;
use tracing::debug;

use super::Forwarder;
use crate::config::TargetConfig;
use crate::error::{ConfigError, ForwardError};
use crate::payload::MarqueePayload;

/// Writes the payload to the controller over SFTP.
///
/// Every forward opens and closes its own SSH session.
#[derive(Clone)]
pub struct SftpForwarder {
    host: String,
    port: u16,
    username: String,
    password: String,
    remote_path: PathBuf,
    timeout: Duration,
}

impl SftpForwarder {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        remote_path: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            remote_path: remote_path.into(),
            timeout,
        }
    }

    pub fn from_config(target: &TargetConfig) -> Result<Self, ConfigError> {
        let host = target
            .remote_ip
            .clone()
            .ok_or(ConfigError::Missing("tty2rpi.remote_ip"))?;
        let username = target
            .username
            .clone()
            .ok_or(ConfigError::Missing("tty2rpi.username"))?;
        let password = target
            .password
            .clone()
            .ok_or(ConfigError::Missing("tty2rpi.password"))?;
        Ok(Self::new(
            host,
            target.port,
            username,
            password,
            &target.remote_path,
            target.connect_timeout(),
        ))
    }

    fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn connect(&self) -> Result<TcpStream, ForwardError> {
        let addr = self.addr();
        let candidates = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|source| ForwardError::Connect {
                addr: addr.clone(),
                source,
            })?;
        let mut last_err = None;
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, self.timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout))?;
                    stream.set_write_timeout(Some(self.timeout))?;
                    return Ok(stream);
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(ForwardError::Connect {
            addr,
            source: last_err.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "host did not resolve")
            }),
        })
    }

    fn write_blocking(&self, payload: &[u8]) -> Result<(), ForwardError> {
        let tcp = self.connect()?;
        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.set_timeout(self.timeout.as_millis().min(u32::MAX as u128) as u32);
        session.handshake()?;
        session.userauth_password(&self.username, &self.password)?;
        if !session.authenticated() {
            return Err(ForwardError::AuthRejected(self.username.clone()));
        }

        let sftp = session.sftp()?;
        let mut remote = sftp.create(Path::new(&self.remote_path))?;
        remote.write_all(payload)?;
        remote.flush()?;
        drop(remote);
        drop(sftp);

        if let Err(err) = session.disconnect(None, "marquee updated", None) {
            debug!(error = %err, "ssh disconnect failed after write");
        }
        Ok(())
    }
}

#[async_trait]
impl Forwarder for SftpForwarder {
    async fn forward(&self, payload: &MarqueePayload) -> Result<(), ForwardError> {
        let this = self.clone();
        let bytes = payload.as_bytes().to_vec();
        tokio::task::spawn_blocking(move || this.write_blocking(&bytes))
            .await
            .map_err(|err| ForwardError::Task(err.to_string()))?
    }

    fn describe(&self) -> String {
        format!(
            "sftp://{}@{}{}",
            self.username,
            self.addr(),
            self.remote_path.display()
        )
    }
}
