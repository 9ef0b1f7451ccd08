use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tty2rpi_bridge::{
    CycleOutcome, FieldSet, ForwardError, Forwarder, LastSent, MarqueePayload, PollLoop,
    SourceError, StateDiffer,
};
use tty2rpi_window_sender::{WindowEnumerator, WindowInfo, WindowTitleSource};

/// Replays desktop states in order; the last one repeats.
struct ScriptedDesktop {
    frames: VecDeque<Result<Vec<WindowInfo>, SourceError>>,
}

impl ScriptedDesktop {
    fn new(frames: impl IntoIterator<Item = Result<Vec<WindowInfo>, SourceError>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl WindowEnumerator for ScriptedDesktop {
    fn visible_windows(&mut self) -> Result<Vec<WindowInfo>, SourceError> {
        if self.frames.len() > 1 {
            return self.frames.pop_front().unwrap_or(Ok(Vec::new()));
        }
        match self.frames.front() {
            Some(Ok(windows)) => Ok(windows.clone()),
            Some(Err(_)) | None => Ok(Vec::new()),
        }
    }
}

#[derive(Clone, Default)]
struct RecordingForwarder {
    attempts: Arc<Mutex<Vec<String>>>,
    fail_next: Arc<Mutex<usize>>,
}

impl RecordingForwarder {
    fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forwarder for RecordingForwarder {
    async fn forward(&self, payload: &MarqueePayload) -> Result<(), ForwardError> {
        self.attempts.lock().unwrap().push(payload.title().to_string());
        let mut fail_next = self.fail_next.lock().unwrap();
        if *fail_next > 0 {
            *fail_next -= 1;
            return Err(ForwardError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "controller unreachable",
            )));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "memory://recording".into()
    }
}

fn pcsx2(title: &str) -> WindowInfo {
    WindowInfo::new(0x1001, title, "pcsx2-qt.exe")
}

fn mame(title: &str) -> WindowInfo {
    WindowInfo::new(0x2002, title, "mame.exe")
}

fn poll_loop(
    desktop: ScriptedDesktop,
    forwarder: RecordingForwarder,
) -> PollLoop<WindowTitleSource<ScriptedDesktop>, RecordingForwarder> {
    PollLoop::new(
        WindowTitleSource::new(desktop),
        forwarder,
        StateDiffer::new(FieldSet::default()),
        Duration::from_millis(500),
    )
}

async fn run_cycles<S, F>(poll: &mut PollLoop<S, F>, count: usize) -> Vec<CycleOutcome>
where
    S: tty2rpi_bridge::StateSource,
    F: Forwarder,
{
    let mut last = LastSent::empty();
    let mut outcomes = Vec::with_capacity(count);
    for _ in 0..count {
        let (next, outcome) = poll.run_cycle(last).await;
        last = next;
        outcomes.push(outcome);
    }
    outcomes
}

#[tokio::test]
async fn unchanged_window_forwards_once() {
    let forwarder = RecordingForwarder::default();
    let mut poll = poll_loop(
        ScriptedDesktop::new([Ok(vec![pcsx2("God of War")])]),
        forwarder.clone(),
    );

    let outcomes = run_cycles(&mut poll, 3).await;

    assert_eq!(
        outcomes,
        vec![
            CycleOutcome::Forwarded,
            CycleOutcome::Unchanged,
            CycleOutcome::Unchanged
        ]
    );
    assert_eq!(forwarder.attempts(), vec!["God of War"]);
}

#[tokio::test]
async fn failed_forward_is_retried_while_window_is_unchanged() {
    let forwarder = RecordingForwarder::default();
    *forwarder.fail_next.lock().unwrap() = 1;
    let mut poll = poll_loop(
        ScriptedDesktop::new([Ok(vec![pcsx2("God of War")])]),
        forwarder.clone(),
    );

    let outcomes = run_cycles(&mut poll, 3).await;

    assert_eq!(
        outcomes,
        vec![
            CycleOutcome::ForwardFailed,
            CycleOutcome::Forwarded,
            CycleOutcome::Unchanged
        ]
    );
    assert_eq!(forwarder.attempts(), vec!["God of War", "God of War"]);
}

#[tokio::test]
async fn transient_dialog_does_not_touch_the_marquee() {
    let forwarder = RecordingForwarder::default();
    let mut poll = poll_loop(
        ScriptedDesktop::new([
            Ok(vec![pcsx2("PCSX2 v1.7.5")]),
            Ok(vec![pcsx2("Open ISO")]),
            Ok(vec![pcsx2("Ico")]),
        ]),
        forwarder.clone(),
    );

    let outcomes = run_cycles(&mut poll, 3).await;

    assert_eq!(
        outcomes,
        vec![
            CycleOutcome::Forwarded,
            CycleOutcome::Unchanged,
            CycleOutcome::Forwarded
        ]
    );
    assert_eq!(forwarder.attempts(), vec!["PS2EMU-MENU", "Ico"]);
}

#[tokio::test]
async fn newest_emulator_wins_and_closing_it_restores_the_other() {
    let forwarder = RecordingForwarder::default();
    let mut poll = poll_loop(
        ScriptedDesktop::new([
            Ok(vec![pcsx2("God of War")]),
            Ok(vec![pcsx2("God of War"), mame("MAME: Galaga [galaga]")]),
            Ok(vec![pcsx2("God of War")]),
            Ok(vec![]),
        ]),
        forwarder.clone(),
    );

    let outcomes = run_cycles(&mut poll, 4).await;

    assert_eq!(
        outcomes,
        vec![
            CycleOutcome::Forwarded,
            CycleOutcome::Forwarded,
            CycleOutcome::Forwarded,
            CycleOutcome::NoState
        ]
    );
    assert_eq!(
        forwarder.attempts(),
        vec!["God of War", "galaga", "God of War"]
    );
}

#[tokio::test]
async fn enumeration_failure_skips_the_cycle() {
    let forwarder = RecordingForwarder::default();
    let mut poll = poll_loop(
        ScriptedDesktop::new([
            Err(SourceError::Unavailable("desktop locked".into())),
            Ok(vec![mame("MAME: No Driver Loaded [___empty]")]),
        ]),
        forwarder.clone(),
    );

    let outcomes = run_cycles(&mut poll, 2).await;

    assert_eq!(
        outcomes,
        vec![CycleOutcome::ReadFailed, CycleOutcome::Forwarded]
    );
    assert_eq!(forwarder.attempts(), vec!["MAME-MENU"]);
}
