use serde::Deserialize;
use tty2rpi_bridge::config::{LoggingConfig, PollConfig, TargetConfig};

/// Shared sections only; `[memcardpro]` and any other section is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    pub tty2rpi: TargetConfig,
    pub poll: PollConfig,
    pub logging: LoggingConfig,
}
