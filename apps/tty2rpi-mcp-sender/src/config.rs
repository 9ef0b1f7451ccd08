use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tty2rpi_bridge::config::{LoggingConfig, PollConfig, TargetConfig};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MEMORY_CARD: &str = "MemoryCard1";
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    pub tty2rpi: TargetConfig,
    pub poll: PollConfig,
    pub logging: LoggingConfig,
    pub memcardpro: MemCardProConfig,
}

/// `[memcardpro]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemCardProConfig {
    pub mcp2_ip: Option<String>,
    pub mcp_gc_ip: Option<String>,
    pub default_memory_card_ps1: String,
    pub default_memory_card_ps2: String,
    pub default_memory_card_gc: String,
    pub game_db: PathBuf,
    pub http_timeout_ms: u64,
}

impl MemCardProConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms.max(1))
    }
}

impl Default for MemCardProConfig {
    fn default() -> Self {
        Self {
            mcp2_ip: None,
            mcp_gc_ip: None,
            default_memory_card_ps1: DEFAULT_MEMORY_CARD.to_string(),
            default_memory_card_ps2: DEFAULT_MEMORY_CARD.to_string(),
            default_memory_card_gc: DEFAULT_MEMORY_CARD.to_string(),
            game_db: PathBuf::from("Game_DB.csv"),
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}
