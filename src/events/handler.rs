//! Event handler for turning terminal input into actions.

use super::InputEvent;
use crate::config::KeyBindings;
use crate::error::Result;
use crate::state::{Action, View};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// Handles input events and produces actions.
pub struct EventHandler {
    keybindings: KeyBindings,
    mouse_support: bool,
}

impl EventHandler {
    pub fn new(keybindings: KeyBindings, mouse_support: bool) -> Self {
        Self {
            keybindings,
            mouse_support,
        }
    }

    /// Wait up to `timeout` for input and map it to an action.
    pub fn next(&self, timeout: Duration) -> Result<Option<Action>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            CrosstermEvent::Key(key) => self.handle_key(key),
            CrosstermEvent::Mouse(mouse) => self.handle_mouse(mouse),
            // The next draw picks up the new size.
            _ => None,
        })
    }

    /// Map a key event to an action.
    pub fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let input = InputEvent::from(key);
        let bindings = &self.keybindings;

        if input.matches(&bindings.quit) {
            return Some(Action::Quit);
        }
        if key.code == KeyCode::Esc {
            return Some(Action::DismissNotification);
        }
        if input.matches(&bindings.help) {
            return Some(Action::ToggleHelp);
        }
        if input.matches(&bindings.refresh) {
            return Some(Action::RefreshFeed);
        }
        if input.matches(&bindings.load_more) {
            return Some(Action::LoadMore);
        }
        if input.matches(&bindings.feed) {
            return Some(Action::SetView(View::Feed));
        }
        if input.matches(&bindings.trades) {
            return Some(Action::SetView(View::Trades));
        }
        if input.matches(&bindings.top) {
            return Some(Action::GoToTop);
        }
        if input.matches(&bindings.bottom) {
            return Some(Action::GoToBottom);
        }
        if input.matches(&bindings.up) {
            return Some(Action::ScrollUp);
        }
        if input.matches(&bindings.down) {
            return Some(Action::ScrollDown);
        }

        match key.code {
            KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Home => Some(Action::GoToTop),
            KeyCode::End => Some(Action::GoToBottom),
            KeyCode::Tab => Some(Action::NextView),
            _ => None,
        }
    }

    /// Map a mouse event to an action.
    pub fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        if !self.mouse_support {
            return None;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn handler() -> EventHandler {
        EventHandler::new(KeyBindings::default(), true)
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn char_key(c: char) -> KeyEvent {
        press(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let handler = handler();
        assert!(matches!(handler.handle_key(char_key('q')), Some(Action::Quit)));
        assert!(matches!(handler.handle_key(char_key('r')), Some(Action::RefreshFeed)));
        assert!(matches!(handler.handle_key(char_key('m')), Some(Action::LoadMore)));
        assert!(matches!(
            handler.handle_key(char_key('2')),
            Some(Action::SetView(View::Trades))
        ));
        assert!(matches!(handler.handle_key(char_key('j')), Some(Action::ScrollDown)));
        assert!(matches!(
            handler.handle_key(press(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Action::NextView)
        ));
    }

    #[test]
    fn test_escape_dismisses_instead_of_quitting() {
        let action = handler().handle_key(press(KeyCode::Esc, KeyModifiers::NONE));
        assert!(matches!(action, Some(Action::DismissNotification)));
    }

    #[test]
    fn test_help_with_reported_shift() {
        let key = press(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert!(matches!(handler().handle_key(key), Some(Action::ToggleHelp)));
    }

    #[test]
    fn test_top_and_bottom() {
        let handler = handler();
        assert!(matches!(handler.handle_key(char_key('g')), Some(Action::GoToTop)));
        let shift_g = press(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert!(matches!(handler.handle_key(shift_g), Some(Action::GoToBottom)));
    }

    #[test]
    fn test_custom_binding_replaces_default() {
        let bindings = KeyBindings {
            refresh: "Ctrl+r".to_string(),
            ..Default::default()
        };
        let handler = EventHandler::new(bindings, true);
        assert!(handler.handle_key(char_key('r')).is_none());
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::RefreshFeed)
        ));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut key = char_key('q');
        key.kind = KeyEventKind::Release;
        assert!(handler().handle_key(key).is_none());
    }

    #[test]
    fn test_mouse_scroll_respects_setting() {
        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert!(matches!(handler().handle_mouse(scroll), Some(Action::ScrollDown)));
        assert!(
            EventHandler::new(KeyBindings::default(), false)
                .handle_mouse(scroll)
                .is_none()
        );
    }
}
