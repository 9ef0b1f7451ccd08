use async_trait::async_trait;

use crate::error::SourceError;
use crate::snapshot::StateSnapshot;

/// Reads "what is playing right now" from some external place.
///
/// `Ok(None)` means nothing relevant is running; it is not an error and the
/// loop simply waits for the next tick.
#[async_trait]
pub trait StateSource: Send {
    async fn read(&mut self) -> Result<Option<StateSnapshot>, SourceError>;

    /// Short label used in log lines.
    fn name(&self) -> &'static str;
}
