use std::collections::{HashMap, HashSet};

use tracing::{debug, info};
use tty2rpi_bridge::StateSnapshot;

use crate::desktop::WindowInfo;
use crate::emulator::Emulator;
use crate::title::{parse_title, ParsedTitle};

#[derive(Debug, Clone)]
struct TrackedWindow {
    emulator: Emulator,
    title: String,
    rom: Option<String>,
    /// Sequence number of the last parse that produced a rom.
    active_at: u64,
}

/// Emulator windows seen on the desktop, keyed by window handle.
#[derive(Debug, Default)]
pub struct WindowTracker {
    windows: HashMap<isize, TrackedWindow>,
    seq: u64,
}

impl WindowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Applies one enumeration of the desktop. Windows of unknown processes
    /// are ignored. A tracked window missing from `visible` keeps its state
    /// while `still_exists` reports its handle alive, and is dropped once
    /// the handle is gone.
    pub fn update(&mut self, visible: &[WindowInfo], still_exists: impl Fn(isize) -> bool) {
        let mut seen = HashSet::with_capacity(visible.len());
        for window in visible {
            let Some(emulator) = Emulator::from_process(&window.process_name) else {
                continue;
            };
            seen.insert(window.handle);
            let previous = self.windows.get(&window.handle).map(|t| t.title.clone());
            match previous {
                None => {
                    info!(
                        handle = window.handle,
                        emulator = %emulator,
                        title = %window.title,
                        "emulator window opened"
                    );
                    self.windows.insert(
                        window.handle,
                        TrackedWindow {
                            emulator,
                            title: window.title.clone(),
                            rom: None,
                            active_at: 0,
                        },
                    );
                }
                Some(previous) if previous != window.title => {
                    info!(
                        handle = window.handle,
                        emulator = %emulator,
                        from = %previous,
                        to = %window.title,
                        "window title changed"
                    );
                }
                Some(_) => continue,
            }
            self.parse(window.handle, &window.title);
        }

        self.windows.retain(|handle, tracked| {
            let open = seen.contains(handle) || still_exists(*handle);
            if !open {
                info!(handle = *handle, title = %tracked.title, "emulator window closed");
            }
            open
        });
    }

    fn parse(&mut self, handle: isize, title: &str) {
        self.seq += 1;
        let seq = self.seq;
        let Some(tracked) = self.windows.get_mut(&handle) else {
            return;
        };
        tracked.title = title.to_string();
        match parse_title(tracked.emulator, title) {
            ParsedTitle::Rom(rom) => {
                info!(emulator = %tracked.emulator, rom = %rom, "emulator title parsed");
                tracked.rom = Some(rom);
                tracked.active_at = seq;
            }
            ParsedTitle::Transient => {
                info!(emulator = %tracked.emulator, title, "transient window skipped");
            }
            ParsedTitle::Empty => {
                debug!(emulator = %tracked.emulator, title, "nothing to show in title");
            }
        }
    }

    /// The rom of the most recently active window, as a snapshot.
    pub fn current(&self) -> Option<StateSnapshot> {
        self.windows
            .values()
            .filter_map(|w| w.rom.as_ref().map(|rom| (w.active_at, w.emulator, rom)))
            .max_by_key(|(active_at, _, _)| *active_at)
            .map(|(_, emulator, rom)| StateSnapshot::titled(rom.clone()).with_mode(emulator.name()))
    }
}
