use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::differ::StateDiffer;
use crate::error::SourceError;
use crate::forward::Forwarder;
use crate::payload::MarqueePayload;
use crate::snapshot::StateSnapshot;
use crate::source::StateSource;

/// The snapshot the controller is known to display.
///
/// Threaded through [`PollLoop::run_cycle`] by value; only a confirmed
/// delivery produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastSent(Option<StateSnapshot>);

impl LastSent {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn snapshot(&self) -> Option<&StateSnapshot> {
        self.0.as_ref()
    }

    fn commit(snapshot: StateSnapshot) -> Self {
        Self(Some(snapshot))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    NoState,
    ReadFailed,
    Unchanged,
    Forwarded,
    ForwardFailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub forwarded: u64,
    pub forward_failures: u64,
    pub read_failures: u64,
}

impl PollStats {
    pub fn record(&mut self, outcome: CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Forwarded => self.forwarded += 1,
            CycleOutcome::ForwardFailed => self.forward_failures += 1,
            CycleOutcome::ReadFailed => self.read_failures += 1,
            CycleOutcome::NoState | CycleOutcome::Unchanged => {}
        }
    }
}

pub struct PollLoop<S, F> {
    source: S,
    forwarder: F,
    differ: StateDiffer,
    interval: Duration,
}

impl<S, F> PollLoop<S, F>
where
    S: StateSource,
    F: Forwarder,
{
    pub fn new(source: S, forwarder: F, differ: StateDiffer, interval: Duration) -> Self {
        Self {
            source,
            forwarder,
            differ,
            interval,
        }
    }

    /// One read/diff/forward pass. Failures are logged and reported through
    /// the outcome; `last` comes back untouched unless a forward succeeded.
    pub async fn run_cycle(&mut self, last: LastSent) -> (LastSent, CycleOutcome) {
        let snapshot = match self.source.read().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!(source = self.source.name(), "no relevant state");
                return (last, CycleOutcome::NoState);
            }
            Err(err @ SourceError::Unavailable(_)) => {
                debug!(source = self.source.name(), error = %err, "read skipped");
                return (last, CycleOutcome::ReadFailed);
            }
            Err(err) => {
                warn!(source = self.source.name(), error = %err, "read failed");
                return (last, CycleOutcome::ReadFailed);
            }
        };

        if !self.differ.changed(last.snapshot(), &snapshot) {
            return (last, CycleOutcome::Unchanged);
        }

        let payload = MarqueePayload::from(&snapshot);
        match self.forwarder.forward(&payload).await {
            Ok(()) => {
                info!(
                    target_uri = %self.forwarder.describe(),
                    mode = snapshot.mode.as_deref().unwrap_or("-"),
                    game_id = snapshot.game_id.as_deref().unwrap_or("-"),
                    payload = %payload,
                    "marquee updated"
                );
                (LastSent::commit(snapshot), CycleOutcome::Forwarded)
            }
            Err(err) => {
                error!(
                    target_uri = %self.forwarder.describe(),
                    payload = %payload,
                    error = %err,
                    "forward failed; will retry next cycle"
                );
                (last, CycleOutcome::ForwardFailed)
            }
        }
    }

    /// Polls every `interval` until `shutdown` resolves.
    pub async fn run_until<Fut>(mut self, shutdown: Fut) -> PollStats
    where
        Fut: Future<Output = ()>,
    {
        let mut stats = PollStats::default();
        let mut last = LastSent::empty();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let (next, outcome) = self.run_cycle(last).await;
                    last = next;
                    stats.record(outcome);
                }
            }
        }

        info!(
            cycles = stats.cycles,
            forwarded = stats.forwarded,
            forward_failures = stats.forward_failures,
            read_failures = stats.read_failures,
            "poll loop stopped"
        );
        stats
    }
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_outcomes() {
        let mut stats = PollStats::default();
        for outcome in [
            CycleOutcome::NoState,
            CycleOutcome::Forwarded,
            CycleOutcome::ForwardFailed,
            CycleOutcome::ReadFailed,
            CycleOutcome::Unchanged,
            CycleOutcome::Forwarded,
        ] {
            stats.record(outcome);
        }
        assert_eq!(
            stats,
            PollStats {
                cycles: 6,
                forwarded: 2,
                forward_failures: 1,
                read_failures: 1,
            }
        );
    }

    #[test]
    fn last_sent_starts_empty() {
        assert!(LastSent::empty().snapshot().is_none());
        assert_eq!(LastSent::default(), LastSent::empty());
    }
}
