use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tty2rpi_bridge::config::{load_config, CliOverrides, TransportKind};
use tty2rpi_bridge::telemetry::init_tracing;
use tty2rpi_bridge::{build_forwarder, poll, PollLoop, StateDiffer};
use tty2rpi_window_sender::{DesktopWindows, SenderConfig, WindowTitleSource, DEFAULT_INTERVAL};

#[derive(Debug, Parser)]
#[command(
    name = "tty2rpi-window-sender",
    author,
    version,
    about = "Shows the game running in a desktop emulator on a tty2rpi marquee"
)]
struct Cli {
    /// TOML config file. When not given, `tty2rpi_sender.toml` is used if present.
    #[arg(long, env = "TTY2RPI_CONFIG")]
    config: Option<PathBuf>,

    /// Address of the tty2rpi controller.
    #[arg(long, env = "TTY2RPI_REMOTE_IP")]
    remote_ip: Option<String>,

    #[arg(long, env = "TTY2RPI_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "TTY2RPI_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// `sftp` or `local`.
    #[arg(long, env = "TTY2RPI_TRANSPORT")]
    transport: Option<TransportKind>,

    /// Poll interval in milliseconds.
    #[arg(long, env = "TTY2RPI_INTERVAL_MS")]
    interval_ms: Option<u64>,
}

impl TryFrom<Cli> for SenderConfig {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut config: SenderConfig =
            load_config(cli.config.as_deref()).context("failed to load config")?;
        CliOverrides {
            transport: cli.transport,
            remote_ip: cli.remote_ip,
            username: cli.username,
            password: cli.password,
            interval_ms: cli.interval_ms,
        }
        .apply(&mut config.tty2rpi, &mut config.poll);
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = SenderConfig::try_from(Cli::parse())?;
    init_tracing(&config.logging);

    let forwarder = build_forwarder(&config.tty2rpi).context("invalid [tty2rpi] settings")?;
    let interval = config.poll.interval_or(DEFAULT_INTERVAL);
    let differ = StateDiffer::new(config.poll.significant_fields.clone());
    info!(
        target_uri = %forwarder.describe(),
        interval_ms = interval.as_millis() as u64,
        significant = ?differ.significant(),
        "tty2rpi window sender starting; press Ctrl-C to stop"
    );

    PollLoop::new(
        WindowTitleSource::new(DesktopWindows),
        forwarder,
        differ,
        interval,
    )
    .run_until(poll::ctrl_c())
    .await;
    Ok(())
}
