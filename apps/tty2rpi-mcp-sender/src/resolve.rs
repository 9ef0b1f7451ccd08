use tty2rpi_bridge::StateSnapshot;

use crate::api::CurrentState;
use crate::game_db::{normalize, GameDb};

/// Which product a candidate host is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// MemCard Pro 2 (PS1/PS2); reports its mode.
    Mcp2,
    /// MemCard Pro GC; older firmware omits `currentMode`.
    McpGc,
}

/// Default memory-card id per console, already normalised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultCards {
    pub ps1: Option<String>,
    pub ps2: Option<String>,
    pub gc: Option<String>,
}

impl DefaultCards {
    pub fn new(ps1: &str, ps2: &str, gc: &str) -> Self {
        let norm = |value: &str| Some(normalize(value)).filter(|v| !v.is_empty());
        Self {
            ps1: norm(ps1),
            ps2: norm(ps2),
            gc: norm(gc),
        }
    }

    pub fn for_mode(&self, mode: &str) -> Option<&str> {
        match mode {
            "PS1" => self.ps1.as_deref(),
            "PS2" => self.ps2.as_deref(),
            "GC" => self.gc.as_deref(),
            _ => None,
        }
    }
}

/// Reported mode upper-cased; `GC` is inferred for the GC device when the
/// firmware leaves it out.
pub fn effective_mode(state: &CurrentState, kind: DeviceKind) -> Option<String> {
    let reported = state
        .current_mode
        .as_deref()
        .map(|m| m.trim().to_uppercase())
        .filter(|m| !m.is_empty());
    reported.or_else(|| (kind == DeviceKind::McpGc).then(|| "GC".to_string()))
}

/// Maps a device state to the snapshot the marquee should show.
///
/// `None` means the id is unknown: not a default card, not in the database,
/// and the device gave no usable name.
pub fn resolve(
    state: &CurrentState,
    kind: DeviceKind,
    cards: &DefaultCards,
    db: &GameDb,
) -> Option<StateSnapshot> {
    let mode = effective_mode(state, kind);
    let game_id = state.game_id().unwrap_or_default();
    let id_norm = normalize(game_id);

    let default_card_mode = mode
        .as_deref()
        .filter(|m| cards.for_mode(m) == Some(id_norm.as_str()));

    let (title, serial) = if let Some(console) = default_card_mode {
        (console.to_string(), None)
    } else if let Some(record) = Some(game_id)
        .filter(|id| !id.is_empty())
        .and_then(|id| db.lookup(id))
    {
        (record.title.clone(), record.serial.clone())
    } else {
        (state.game_name()?.trim().to_string(), None)
    };

    Some(StateSnapshot {
        mode,
        title,
        game_id: Some(game_id.to_string()).filter(|id| !id.is_empty()),
        serial,
        channel: state.current_channel,
        rssi: state.rssi,
        size: state.current_size.clone(),
    })
}
