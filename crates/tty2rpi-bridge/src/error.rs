use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a poll produced no snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Device unreachable, timed out, answered with an error status, or the
    /// platform cannot be inspected at all.
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed source data: {0}")]
    Malformed(String),
}

impl SourceError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceError::Unavailable(_))
    }
}

/// Delivery to the display controller failed; nothing was committed.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("ssh error: {0}")]
    Ssh(#[from] ssh2::Error),
    #[error("authentication rejected for user '{0}'")]
    AuthRejected(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("forward task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("config error: {0}")]
    Invalid(String),
}
