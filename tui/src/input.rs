//! Input handling for the Seen It TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use seenit_engine::App;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// What a key press asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ClaimSeen,
    ClaimNew,
    Retry,
    Quit,
}

/// Map a key event to an action.
///
/// Only presses count: a held key must not fire a stream of claims.
#[must_use]
pub fn key_action(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(Action::Quit);
    }
    match key.code {
        KeyCode::Char('s' | 'S' | 'y' | 'Y') | KeyCode::Left => Some(Action::ClaimSeen),
        KeyCode::Char('n' | 'N') | KeyCode::Right => Some(Action::ClaimNew),
        KeyCode::Char('r' | 'R') => Some(Action::Retry),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Apply an action. Returns true when the app should exit.
pub fn apply_action(app: &mut App, action: Action) -> bool {
    match action {
        Action::ClaimSeen => {
            let report = app.claim_seen();
            debug!(?report, "Claimed seen");
        }
        Action::ClaimNew => {
            let report = app.claim_new();
            debug!(?report, "Claimed new");
        }
        Action::Retry => {
            if !app.retry() {
                debug!("Retry ignored, no failed round");
            }
        }
        Action::Quit => app.request_quit(),
    }
    app.should_quit()
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a send blocked on capacity returns.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending input. Returns `Ok(true)` when the app should exit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        processed += 1;

        let Event::Key(key) = ev else {
            continue;
        };
        if let Some(action) = key_action(key)
            && apply_action(app, action)
        {
            return Ok(true);
        }
    }
    Ok(app.should_quit())
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{Action, key_action};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn claim_keys() {
        for code in [KeyCode::Char('s'), KeyCode::Char('y'), KeyCode::Left] {
            assert_eq!(key_action(press(code)), Some(Action::ClaimSeen));
        }
        for code in [KeyCode::Char('n'), KeyCode::Right] {
            assert_eq!(key_action(press(code)), Some(Action::ClaimNew));
        }
    }

    #[test]
    fn retry_and_quit_keys() {
        assert_eq!(key_action(press(KeyCode::Char('r'))), Some(Action::Retry));
        assert_eq!(key_action(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(
            key_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn control_chords_do_not_claim() {
        assert_eq!(
            key_action(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn repeats_and_releases_are_ignored() {
        for kind in [KeyEventKind::Repeat, KeyEventKind::Release] {
            let key = KeyEvent {
                code: KeyCode::Char('n'),
                modifiers: KeyModifiers::NONE,
                kind,
                state: KeyEventState::NONE,
            };
            assert_eq!(key_action(key), None);
        }
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        assert_eq!(key_action(press(KeyCode::Char('x'))), None);
        assert_eq!(key_action(press(KeyCode::Enter)), None);
    }
}
