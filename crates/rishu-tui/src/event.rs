//! Terminal event handling — captures keyboard, paste, and resize events
//! from crossterm and dispatches them as Actions.
//!
//! The handler operates in two modes:
//! - Normal: keys are mapped to shortcuts (quit, submit, provider, scroll).
//! - Editing: keys are forwarded as raw CharInput/BackspaceInput so the
//!   query text area can receive typed characters.
//!
//! The current InputMode is shared between the App and EventHandler via
//! an Arc<AtomicU8>.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use rishu_core::Provider;

use crate::action::{Action, InputMode};

/// Encode InputMode as u8 for atomic sharing.
const MODE_NORMAL: u8 = 0;
const MODE_EDITING: u8 = 1;

/// Shared flag the App sets so the EventHandler knows which keymap to use.
pub type InputModeFlag = Arc<AtomicU8>;

pub fn new_input_mode_flag() -> InputModeFlag {
    Arc::new(AtomicU8::new(MODE_NORMAL))
}

pub fn set_input_mode(flag: &InputModeFlag, mode: InputMode) {
    let val = match mode {
        InputMode::Normal => MODE_NORMAL,
        InputMode::Editing => MODE_EDITING,
    };
    flag.store(val, Ordering::Relaxed);
}

pub fn get_input_mode(flag: &InputModeFlag) -> InputMode {
    match flag.load(Ordering::Relaxed) {
        MODE_EDITING => InputMode::Editing,
        _ => InputMode::Normal,
    }
}

/// Event loop that reads terminal events and sends Actions.
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Action>,
    tick_rate: Duration,
    mode_flag: InputModeFlag,
}

impl EventHandler {
    pub fn new(
        tx: mpsc::UnboundedSender<Action>,
        tick_rate: Duration,
        mode_flag: InputModeFlag,
    ) -> Self {
        Self {
            tx,
            tick_rate,
            mode_flag,
        }
    }

    /// Run the event loop. This blocks and should be spawned in a task.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.tick_rate);

        loop {
            let action = tokio::select! {
                _ = interval.tick() => {
                    Some(Action::Tick)
                }
                result = tokio::task::spawn_blocking({
                    || {
                        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                            event::read().ok()
                        } else {
                            None
                        }
                    }
                }) => {
                    match result {
                        Ok(Some(event)) => self.map_event(event),
                        _ => None,
                    }
                }
            };

            if let Some(action) = action {
                if self.tx.send(action).is_err() {
                    break;
                }
            }
        }
    }

    pub fn map_event(&self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.map_key(key),
            Event::Paste(text) => Some(Action::PasteBulk(text)),
            Event::Resize(_, _) => Some(Action::Tick),
            _ => None,
        }
    }

    fn map_key(&self, key: KeyEvent) -> Option<Action> {
        // Ctrl+C always quits regardless of mode.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        match get_input_mode(&self.mode_flag) {
            InputMode::Editing => self.map_key_editing(key),
            InputMode::Normal => self.map_key_normal(key),
        }
    }

    /// Key mapping when the text area is focused. Most keys become character
    /// input; only a few are reserved.
    fn map_key_editing(&self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('w') => Some(Action::DeleteWord),
                KeyCode::Char('s') => Some(Action::SubmitQuery),
                KeyCode::Enter => Some(Action::SubmitQuery),
                _ => None,
            };
        }

        // Alt+Enter also submits (some terminals send this instead of Ctrl+Enter).
        if key.modifiers.contains(KeyModifiers::ALT) && key.code == KeyCode::Enter {
            return Some(Action::SubmitQuery);
        }

        match key.code {
            KeyCode::Esc => Some(Action::StopEditing),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::ToggleProvider),
            KeyCode::Enter => Some(Action::NewlineInput),
            KeyCode::Left => Some(Action::CursorLeft),
            KeyCode::Right => Some(Action::CursorRight),
            // Up/down scroll the results while typing.
            KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Backspace => Some(Action::BackspaceInput),
            KeyCode::Char(c) => Some(Action::CharInput(c)),
            _ => None,
        }
    }

    /// Key mapping in normal mode — shortcuts.
    fn map_key_normal(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('i') | KeyCode::Char('e') => Some(Action::StartEditing),
            KeyCode::Enter | KeyCode::Char('s') => Some(Action::SubmitQuery),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                Some(Action::ToggleProvider)
            }
            KeyCode::Char('l') => Some(Action::SelectProvider(Provider::Local)),
            KeyCode::Char('g') => Some(Action::SelectProvider(Provider::Gemini)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
            KeyCode::Esc => Some(Action::ClearStatus),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(mode: InputMode) -> EventHandler {
        let (tx, _rx) = mpsc::unbounded_channel();
        let flag = new_input_mode_flag();
        set_input_mode(&flag, mode);
        EventHandler::new(tx, Duration::from_millis(100), flag)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn editing_mode_forwards_characters() {
        let h = handler(InputMode::Editing);
        let action = h.map_event(key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(matches!(action, Some(Action::CharInput('q'))));
        let action = h.map_event(key(KeyCode::Enter, KeyModifiers::NONE));
        assert!(matches!(action, Some(Action::NewlineInput)));
    }

    #[test]
    fn ctrl_s_submits_while_editing() {
        let h = handler(InputMode::Editing);
        let action = h.map_event(key(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert!(matches!(action, Some(Action::SubmitQuery)));
    }

    #[test]
    fn normal_mode_maps_shortcuts() {
        let h = handler(InputMode::Normal);
        assert!(matches!(
            h.map_event(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        ));
        assert!(matches!(
            h.map_event(key(KeyCode::Char('g'), KeyModifiers::NONE)),
            Some(Action::SelectProvider(Provider::Gemini))
        ));
        assert!(matches!(
            h.map_event(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::SubmitQuery)
        ));
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        for mode in [InputMode::Normal, InputMode::Editing] {
            let h = handler(mode);
            assert!(matches!(
                h.map_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
                Some(Action::Quit)
            ));
        }
    }

    #[test]
    fn paste_is_forwarded_whole() {
        let h = handler(InputMode::Editing);
        let action = h.map_event(Event::Paste("地域振興\nまちづくり".into()));
        assert!(matches!(action, Some(Action::PasteBulk(ref s)) if s == "地域振興\nまちづくり"));
    }
}
