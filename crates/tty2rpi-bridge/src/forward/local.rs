use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use super::Forwarder;
use crate::error::{ConfigError, ForwardError};
use crate::payload::MarqueePayload;

/// Replaces the socket file on the local filesystem.
///
/// The payload lands in `<path>.tmp` first and is renamed over the target,
/// so tty2rpi never reads a half-written command.
#[derive(Debug, Clone)]
pub struct LocalFileForwarder {
    path: PathBuf,
}

impl LocalFileForwarder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut raw = self.path.clone().into_os_string();
        raw.push(".tmp");
        PathBuf::from(raw)
    }

    /// Fails early when the target directory is missing or read-only.
    pub fn ensure_writable(&self) -> Result<(), ConfigError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.is_dir() {
            return Err(ConfigError::Invalid(format!(
                "directory {} does not exist",
                parent.display()
            )));
        }
        let probe = self.tmp_path();
        File::create(&probe)
            .and_then(|_| fs::remove_file(&probe))
            .map_err(|err| {
                ConfigError::Invalid(format!("cannot write to {}: {err}", parent.display()))
            })
    }

    fn write_blocking(&self, payload: &[u8]) -> Result<(), ForwardError> {
        let tmp = self.tmp_path();
        let result = (|| {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp)?;
            file.write_all(payload)?;
            file.flush()?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        })();
        if let Err(err) = result {
            if tmp.exists() {
                if let Err(cleanup) = fs::remove_file(&tmp) {
                    warn!(path = %tmp.display(), error = %cleanup, "failed to remove temp file");
                }
            }
            return Err(ForwardError::Io(err));
        }
        Ok(())
    }
}

#[async_trait]
impl Forwarder for LocalFileForwarder {
    async fn forward(&self, payload: &MarqueePayload) -> Result<(), ForwardError> {
        let this = self.clone();
        let bytes = payload.as_bytes().to_vec();
        tokio::task::spawn_blocking(move || this.write_blocking(&bytes))
            .await
            .map_err(|err| ForwardError::Task(err.to_string()))?
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}
