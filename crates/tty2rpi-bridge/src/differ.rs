use std::collections::BTreeSet;

use serde::Deserialize;

use crate::snapshot::{SnapshotField, StateSnapshot};

/// Fields that count when deciding whether a snapshot is new.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(BTreeSet<SnapshotField>);

impl FieldSet {
    pub fn new(fields: impl IntoIterator<Item = SnapshotField>) -> Self {
        Self(fields.into_iter().collect())
    }

    pub fn all() -> Self {
        Self::new(SnapshotField::ALL)
    }

    pub fn contains(&self, field: SnapshotField) -> bool {
        self.0.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = SnapshotField> + '_ {
        self.0.iter().copied()
    }
}

/// Mode, title and game id. Link telemetry (rssi, channel, size) moves on
/// every poll and would otherwise re-send the same marquee.
impl Default for FieldSet {
    fn default() -> Self {
        Self::new([
            SnapshotField::Mode,
            SnapshotField::Title,
            SnapshotField::GameId,
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct StateDiffer {
    significant: FieldSet,
}

impl StateDiffer {
    pub fn new(significant: FieldSet) -> Self {
        Self { significant }
    }

    pub fn significant(&self) -> &FieldSet {
        &self.significant
    }

    /// A snapshot is changed when nothing was sent yet or any significant
    /// field differs from what was sent.
    pub fn changed(&self, last: Option<&StateSnapshot>, next: &StateSnapshot) -> bool {
        match last {
            None => true,
            Some(last) => self
                .significant
                .iter()
                .any(|field| !last.same_field(next, field)),
        }
    }
}
