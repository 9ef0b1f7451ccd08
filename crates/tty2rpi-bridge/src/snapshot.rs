use serde::Deserialize;

/// What the marquee should currently show, as captured by one poll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateSnapshot {
    /// Platform or emulator identifier (`PS2`, `GC`, `mame`, ...).
    pub mode: Option<String>,
    /// Display name; this is what ends up in the tty2rpi command.
    pub title: String,
    pub game_id: Option<String>,
    pub serial: Option<String>,
    pub channel: Option<u32>,
    pub rssi: Option<i32>,
    pub size: Option<String>,
}

impl StateSnapshot {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    /// True when both snapshots agree on `field`.
    pub fn same_field(&self, other: &Self, field: SnapshotField) -> bool {
        match field {
            SnapshotField::Mode => self.mode == other.mode,
            SnapshotField::Title => self.title == other.title,
            SnapshotField::GameId => self.game_id == other.game_id,
            SnapshotField::Serial => self.serial == other.serial,
            SnapshotField::Channel => self.channel == other.channel,
            SnapshotField::Rssi => self.rssi == other.rssi,
            SnapshotField::Size => self.size == other.size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotField {
    Mode,
    Title,
    GameId,
    Serial,
    Channel,
    Rssi,
    Size,
}

impl SnapshotField {
    pub const ALL: [SnapshotField; 7] = [
        SnapshotField::Mode,
        SnapshotField::Title,
        SnapshotField::GameId,
        SnapshotField::Serial,
        SnapshotField::Channel,
        SnapshotField::Rssi,
        SnapshotField::Size,
    ];
}
