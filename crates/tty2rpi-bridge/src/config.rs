use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::differ::FieldSet;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "tty2rpi_sender.toml";
pub const DEFAULT_REMOTE_PATH: &str = "/dev/shm/tty2rpi.socket";
const DEFAULT_SSH_PORT: u16 = 22;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// How the payload reaches the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// SFTP over SSH to `remote_ip`.
    #[default]
    Sftp,
    /// Direct write, for senders running on the controller itself.
    Local,
}

impl std::str::FromStr for TransportKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sftp" | "ssh" => Ok(TransportKind::Sftp),
            "local" | "file" => Ok(TransportKind::Local),
            other => Err(format!("unknown transport: {other}")),
        }
    }
}

/// `[tty2rpi]` section.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub transport: TransportKind,
    pub remote_ip: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub remote_path: String,
    pub connect_timeout_ms: u64,
}

impl TargetConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote_path.trim().is_empty() {
            return Err(ConfigError::Missing("tty2rpi.remote_path"));
        }
        if self.transport == TransportKind::Local {
            return Ok(());
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "tty2rpi.connect_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if blank(&self.remote_ip) {
            return Err(ConfigError::Missing("tty2rpi.remote_ip"));
        }
        if blank(&self.username) {
            return Err(ConfigError::Missing("tty2rpi.username"));
        }
        if self.password.is_none() {
            return Err(ConfigError::Missing("tty2rpi.password"));
        }
        Ok(())
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            remote_ip: None,
            port: DEFAULT_SSH_PORT,
            username: None,
            password: None,
            remote_path: DEFAULT_REMOTE_PATH.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for TargetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetConfig")
            .field("transport", &self.transport)
            .field("remote_ip", &self.remote_ip)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("remote_path", &self.remote_path)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .finish()
    }
}

/// `[poll]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: Option<u64>,
    pub significant_fields: FieldSet,
}

impl PollConfig {
    pub fn interval_or(&self, fallback: Duration) -> Duration {
        self.interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(fallback)
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: String,
}

impl LoggingConfig {
    /// `EnvFilter` directive for this section. Disabled logging still lets
    /// errors through.
    pub fn directive(&self) -> String {
        if !self.enabled {
            return "error".to_string();
        }
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "warn" | "warning" => "warn",
            "error" | "critical" => "error",
            _ => "info",
        }
        .to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
        }
    }
}

/// Flag and environment values layered over the file's `[tty2rpi]` and
/// `[poll]` sections. `None` keeps the file value.
#[derive(Clone, Default)]
pub struct CliOverrides {
    pub transport: Option<TransportKind>,
    pub remote_ip: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub interval_ms: Option<u64>,
}

impl CliOverrides {
    pub fn apply(self, target: &mut TargetConfig, poll: &mut PollConfig) {
        if let Some(transport) = self.transport {
            target.transport = transport;
        }
        if self.remote_ip.is_some() {
            target.remote_ip = self.remote_ip;
        }
        if self.username.is_some() {
            target.username = self.username;
        }
        if self.password.is_some() {
            target.password = self.password;
        }
        if self.interval_ms.is_some() {
            poll.interval_ms = self.interval_ms;
        }
    }
}

/// Loads an explicitly named config, which must exist, or else the default
/// `tty2rpi_sender.toml` when present.
pub fn load_config<T>(explicit: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    match explicit {
        Some(path) => load_toml(path),
        None => load_toml_or_default(Path::new(DEFAULT_CONFIG_PATH), false),
    }
}

/// Parses a TOML config file into `T`.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_toml(path, &raw)
}

/// Like [`load_toml`], but a missing file yields `T::default()` unless
/// `required` is set.
pub fn load_toml_or_default<T>(path: &Path, required: bool) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    if !required && !path.exists() {
        return Ok(T::default());
    }
    load_toml(path)
}

pub fn parse_toml<T: DeserializeOwned>(path: &Path, raw: &str) -> Result<T, ConfigError> {
    toml::from_str(raw).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).map_or(true, str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotField;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        tty2rpi: TargetConfig,
        poll: PollConfig,
        logging: LoggingConfig,
    }

    #[test]
    fn parses_full_sections() {
        let raw = r#"
            [tty2rpi]
            remote_ip = "192.168.1.50"
            username = "tty2rpi"
            password = "secret"
            connect_timeout_ms = 2500

            [poll]
            interval_ms = 1000
            significant_fields = ["title", "rssi"]

            [logging]
            enabled = true
            level = "DEBUG"
        "#;
        let sample: Sample = parse_toml(Path::new("inline.toml"), raw).unwrap();
        assert_eq!(sample.tty2rpi.transport, TransportKind::Sftp);
        assert_eq!(sample.tty2rpi.port, 22);
        assert_eq!(sample.tty2rpi.remote_path, DEFAULT_REMOTE_PATH);
        assert_eq!(sample.tty2rpi.connect_timeout(), Duration::from_millis(2500));
        assert!(sample.tty2rpi.validate().is_ok());
        assert_eq!(
            sample.poll.interval_or(Duration::from_secs(5)),
            Duration::from_secs(1)
        );
        assert!(sample.poll.significant_fields.contains(SnapshotField::Rssi));
        assert!(!sample.poll.significant_fields.contains(SnapshotField::Mode));
        assert_eq!(sample.logging.directive(), "debug");
    }

    #[test]
    fn defaults_apply_to_empty_file() {
        let sample: Sample = parse_toml(Path::new("empty.toml"), "").unwrap();
        assert_eq!(sample.poll.significant_fields, FieldSet::default());
        assert_eq!(
            sample.poll.interval_or(Duration::from_millis(500)),
            Duration::from_millis(500)
        );
        assert_eq!(sample.logging.directive(), "info");
    }

    #[test]
    fn sftp_requires_credentials() {
        let target = TargetConfig {
            remote_ip: Some("10.0.0.2".into()),
            username: Some("pi".into()),
            ..TargetConfig::default()
        };
        assert!(matches!(
            target.validate(),
            Err(ConfigError::Missing("tty2rpi.password"))
        ));
    }

    #[test]
    fn local_transport_needs_only_a_path() {
        let target = TargetConfig {
            transport: TransportKind::Local,
            ..TargetConfig::default()
        };
        assert!(target.validate().is_ok());
    }

    #[test]
    fn disabled_logging_keeps_errors() {
        let logging = LoggingConfig {
            enabled: false,
            level: "debug".into(),
        };
        assert_eq!(logging.directive(), "error");
    }

    #[test]
    fn unknown_field_name_is_rejected() {
        let raw = "[poll]\nsignificant_fields = [\"volume\"]\n";
        let err = parse_toml::<Sample>(Path::new("bad.toml"), raw).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn debug_output_redacts_password() {
        let target = TargetConfig {
            password: Some("hunter2".into()),
            ..TargetConfig::default()
        };
        let rendered = format!("{target:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn zero_connect_timeout_is_rejected_for_sftp() {
        let raw = r#"
            [tty2rpi]
            remote_ip = "127.0.0.1"
            username = "tty2rpi"
            password = "tty2rpi"
            connect_timeout_ms = 0
        "#;
        let sample: Sample = parse_toml(Path::new("inline.toml"), raw).unwrap();
        assert!(matches!(
            sample.tty2rpi.validate(),
            Err(ConfigError::Invalid(_))
        ));

        let local = TargetConfig {
            transport: TransportKind::Local,
            connect_timeout_ms: 0,
            ..TargetConfig::default()
        };
        assert!(local.validate().is_ok());
    }

    fn file_sample() -> Sample {
        let raw = r#"
            [tty2rpi]
            remote_ip = "192.168.1.50"
            username = "file-user"
            password = "file-pass"

            [poll]
            interval_ms = 5000
        "#;
        parse_toml(Path::new("inline.toml"), raw).unwrap()
    }

    #[test]
    fn flags_win_over_file_values() {
        let mut sample = file_sample();
        CliOverrides {
            transport: Some(TransportKind::Local),
            remote_ip: Some("10.0.0.9".into()),
            password: Some("flag-pass".into()),
            interval_ms: Some(750),
            ..CliOverrides::default()
        }
        .apply(&mut sample.tty2rpi, &mut sample.poll);

        assert_eq!(sample.tty2rpi.transport, TransportKind::Local);
        assert_eq!(sample.tty2rpi.remote_ip.as_deref(), Some("10.0.0.9"));
        assert_eq!(sample.tty2rpi.password.as_deref(), Some("flag-pass"));
        assert_eq!(sample.tty2rpi.username.as_deref(), Some("file-user"));
        assert_eq!(sample.poll.interval_ms, Some(750));
    }

    #[test]
    fn file_values_stay_without_flags() {
        let mut sample = file_sample();
        CliOverrides::default().apply(&mut sample.tty2rpi, &mut sample.poll);

        assert_eq!(sample.tty2rpi.transport, TransportKind::Sftp);
        assert_eq!(sample.tty2rpi.remote_ip.as_deref(), Some("192.168.1.50"));
        assert_eq!(sample.tty2rpi.username.as_deref(), Some("file-user"));
        assert_eq!(sample.tty2rpi.password.as_deref(), Some("file-pass"));
        assert_eq!(sample.poll.interval_ms, Some(5000));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("tty2rpi_sender.toml");
        let err = load_config::<Sample>(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        std::fs::write(&missing, "[tty2rpi]\nremote_ip = \"10.0.0.2\"\n").unwrap();
        let sample: Sample = load_config(Some(&missing)).unwrap();
        assert_eq!(sample.tty2rpi.remote_ip.as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn missing_optional_file_yields_default() {
        let sample: Sample =
            load_toml_or_default(Path::new("/definitely/not/here.toml"), false).unwrap();
        assert!(sample.tty2rpi.remote_ip.is_none());
        assert!(load_toml_or_default::<Sample>(Path::new("/definitely/not/here.toml"), true)
            .is_err());
    }
}
