//! Window-title state source for the tty2rpi marquee.
//!
//! Visible windows owned by a known emulator executable are tracked by
//! handle and their titles parsed with per-emulator rules; the game in the
//! most recently active window is what the marquee shows.

pub mod config;
pub mod desktop;
pub mod emulator;
pub mod source;
pub mod title;
pub mod tracker;

use std::time::Duration;

pub use config::SenderConfig;
pub use desktop::{DesktopWindows, WindowEnumerator, WindowInfo};
pub use emulator::Emulator;
pub use source::WindowTitleSource;
pub use title::{parse_title, ParsedTitle};
pub use tracker::WindowTracker;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
