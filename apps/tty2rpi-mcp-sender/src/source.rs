use async_trait::async_trait;
use tracing::{debug, info, warn};
use tty2rpi_bridge::{SourceError, StateSnapshot, StateSource};

use crate::api::{CurrentState, MemCardProClient};
use crate::config::MemCardProConfig;
use crate::game_db::GameDb;
use crate::resolve::{effective_mode, resolve, DefaultCards, DeviceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCandidate {
    pub host: String,
    pub kind: DeviceKind,
}

impl DeviceCandidate {
    pub fn new(host: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            host: host.into(),
            kind,
        }
    }
}

/// Polls whichever MemCard Pro answers and resolves its loaded game.
///
/// Candidates are probed in order until one responds; that device is used
/// until a request against it fails to reach it, then discovery starts over.
pub struct MemCardProSource {
    client: MemCardProClient,
    candidates: Vec<DeviceCandidate>,
    current: Option<DeviceCandidate>,
    last_mode: Option<String>,
    cards: DefaultCards,
    db: GameDb,
}

impl MemCardProSource {
    pub fn new(
        client: MemCardProClient,
        candidates: Vec<DeviceCandidate>,
        cards: DefaultCards,
        db: GameDb,
    ) -> Self {
        Self {
            client,
            candidates,
            current: None,
            last_mode: None,
            cards,
            db,
        }
    }

    pub fn from_config(config: &MemCardProConfig) -> Result<Self, reqwest::Error> {
        let client = MemCardProClient::new(config.http_timeout())?;
        let candidates = candidates_from(config);
        let cards = DefaultCards::new(
            &config.default_memory_card_ps1,
            &config.default_memory_card_ps2,
            &config.default_memory_card_gc,
        );
        Ok(Self::new(client, candidates, cards, GameDb::load(&config.game_db)))
    }

    pub fn candidates(&self) -> &[DeviceCandidate] {
        &self.candidates
    }

    pub fn current_device(&self) -> Option<&DeviceCandidate> {
        self.current.as_ref()
    }

    async fn discover(&mut self) -> Result<(DeviceCandidate, CurrentState), SourceError> {
        for candidate in &self.candidates {
            match self.client.current_state(&candidate.host).await {
                Ok(state) => {
                    info!(host = %candidate.host, kind = ?candidate.kind, "MemCard Pro detected");
                    self.current = Some(candidate.clone());
                    self.last_mode = None;
                    return Ok((candidate.clone(), state));
                }
                Err(err) => {
                    debug!(host = %candidate.host, error = %err, "candidate did not answer");
                }
            }
        }
        Err(SourceError::Unavailable(
            "no MemCard Pro answered; retrying next cycle".to_string(),
        ))
    }

    fn observe_mode(&mut self, device: &DeviceCandidate, state: &CurrentState) {
        let Some(mode) = effective_mode(state, device.kind) else {
            return;
        };
        if self.last_mode.as_deref() == Some(mode.as_str()) {
            return;
        }
        info!(mode = %mode, host = %device.host, "MemCard Pro mode");
        match mode.as_str() {
            "PS1" | "PS2" | "GC" => debug!(
                mode = %mode,
                channel = ?state.current_channel,
                size = ?state.current_size,
                rssi = ?state.rssi,
                "card telemetry"
            ),
            _ => warn!(
                mode = state.current_mode.as_deref().unwrap_or("UNKNOWN"),
                "unrecognized MemCard Pro mode"
            ),
        }
        self.last_mode = Some(mode);
    }
}

#[async_trait]
impl StateSource for MemCardProSource {
    async fn read(&mut self) -> Result<Option<StateSnapshot>, SourceError> {
        let (device, state) = match self.current.clone() {
            Some(device) => match self.client.current_state(&device.host).await {
                Ok(state) => (device, state),
                Err(err) => {
                    if err.is_unavailable() {
                        warn!(host = %device.host, error = %err, "lost connection to MemCard Pro; searching again");
                        self.current = None;
                        self.last_mode = None;
                    }
                    return Err(err);
                }
            },
            None => self.discover().await?,
        };

        self.observe_mode(&device, &state);

        let snapshot = resolve(&state, device.kind, &self.cards, &self.db);
        match &snapshot {
            Some(snapshot) => debug!(
                game_id = snapshot.game_id.as_deref().unwrap_or("-"),
                title = %snapshot.title,
                serial = snapshot.serial.as_deref().unwrap_or("-"),
                "MemCard Pro state"
            ),
            None => debug!(
                game_id = state.game_id().unwrap_or("-"),
                "game id not in database; skipping"
            ),
        }
        Ok(snapshot)
    }

    fn name(&self) -> &'static str {
        "memcardpro"
    }
}

/// MC Pro 2 first, then MC Pro GC; blank entries are left out.
pub fn candidates_from(config: &MemCardProConfig) -> Vec<DeviceCandidate> {
    [
        (config.mcp2_ip.as_deref(), DeviceKind::Mcp2),
        (config.mcp_gc_ip.as_deref(), DeviceKind::McpGc),
    ]
    .into_iter()
    .filter_map(|(host, kind)| {
        host.map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| DeviceCandidate::new(h, kind))
    })
    .collect()
}
