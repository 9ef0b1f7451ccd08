//! Shared plumbing for the tty2rpi marquee senders.
//!
//! Each sender binary supplies a [`StateSource`]; this crate decides whether
//! the snapshot it reports is new, formats the tty2rpi command and pushes it
//! to the display controller through a [`Forwarder`].

pub mod config;
pub mod differ;
pub mod error;
pub mod forward;
pub mod payload;
pub mod poll;
pub mod snapshot;
pub mod source;
pub mod telemetry;

pub use differ::{FieldSet, StateDiffer};
pub use error::{ConfigError, ForwardError, SourceError};
pub use forward::{build_forwarder, Forwarder, LocalFileForwarder, SftpForwarder};
pub use payload::MarqueePayload;
pub use poll::{CycleOutcome, LastSent, PollLoop, PollStats};
pub use snapshot::{SnapshotField, StateSnapshot};
pub use source::StateSource;
