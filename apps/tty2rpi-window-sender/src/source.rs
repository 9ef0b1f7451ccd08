use async_trait::async_trait;
use tty2rpi_bridge::{SourceError, StateSnapshot, StateSource};

use crate::desktop::WindowEnumerator;
use crate::tracker::WindowTracker;

/// Reports the game shown in the most recently active emulator window.
pub struct WindowTitleSource<E> {
    enumerator: E,
    tracker: WindowTracker,
}

impl<E: WindowEnumerator> WindowTitleSource<E> {
    pub fn new(enumerator: E) -> Self {
        Self {
            enumerator,
            tracker: WindowTracker::new(),
        }
    }
}

#[async_trait]
impl<E: WindowEnumerator> StateSource for WindowTitleSource<E> {
    async fn read(&mut self) -> Result<Option<StateSnapshot>, SourceError> {
        let visible = self.enumerator.visible_windows()?;
        let enumerator = &self.enumerator;
        self.tracker.update(&visible, |handle| enumerator.is_window(handle));
        Ok(self.tracker.current())
    }

    fn name(&self) -> &'static str {
        "windows"
    }
}
