use std::fmt;

use crate::snapshot::StateSnapshot;

/// Command prefix tty2rpi watches for in its socket file.
pub const CMDCOR_PREFIX: &str = "CMDCOR§PARAM§";

/// The exact text written to the controller's socket file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarqueePayload(String);

impl MarqueePayload {
    pub fn for_title(title: &str) -> Self {
        Self(format!("{CMDCOR_PREFIX}{title}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn title(&self) -> &str {
        self.0.strip_prefix(CMDCOR_PREFIX).unwrap_or(&self.0)
    }
}

impl From<&StateSnapshot> for MarqueePayload {
    fn from(snapshot: &StateSnapshot) -> Self {
        Self::for_title(&snapshot.title)
    }
}

impl fmt::Display for MarqueePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
