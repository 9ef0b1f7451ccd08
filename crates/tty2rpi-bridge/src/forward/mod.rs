mod local;
mod sftp;

use async_trait::async_trait;

use crate::config::{TargetConfig, TransportKind};
use crate::error::{ConfigError, ForwardError};
use crate::payload::MarqueePayload;

pub use local::LocalFileForwarder;
pub use sftp::SftpForwarder;

/// Pushes a payload to the tty2rpi controller.
///
/// Returning `Ok` means the controller's socket file now holds the payload;
/// the poll loop commits its last-sent state only then.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, payload: &MarqueePayload) -> Result<(), ForwardError>;

    /// Where payloads go, for log lines.
    fn describe(&self) -> String;
}

#[async_trait]
impl<F: Forwarder + ?Sized> Forwarder for Box<F> {
    async fn forward(&self, payload: &MarqueePayload) -> Result<(), ForwardError> {
        (**self).forward(payload).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Builds the forwarder selected by `[tty2rpi] transport`.
pub fn build_forwarder(target: &TargetConfig) -> Result<Box<dyn Forwarder>, ConfigError> {
    target.validate()?;
    match target.transport {
        TransportKind::Sftp => Ok(Box::new(SftpForwarder::from_config(target)?)),
        TransportKind::Local => {
            let forwarder = LocalFileForwarder::new(&target.remote_path);
            forwarder.ensure_writable()?;
            Ok(Box::new(forwarder))
        }
    }
}
