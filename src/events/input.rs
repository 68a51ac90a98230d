//! Key parsing and configurable key bindings.

use crate::error::{Error, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Simplified key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Unknown,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Unknown,
        }
    }
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        Self {
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            shift: mods.contains(KeyModifiers::SHIFT),
        }
    }
}

/// A processed key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self {
            key: Key::from(event.code),
            modifiers: Modifiers::from(event.modifiers),
        }
    }
}

impl InputEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A bare key press.
    pub fn key(key: Key) -> Self {
        Self::new(key, Modifiers::default())
    }

    /// Check against a binding string such as `"q"`, `"Shift+g"` or `"Ctrl+r"`.
    ///
    /// Unparsable bindings never match.
    pub fn matches(&self, binding: &str) -> bool {
        KeyBinding::parse(binding).is_ok_and(|b| b.matches(self))
    }
}

/// A parsed key binding.
///
/// Characters are case-sensitive and `Shift+<letter>` is stored as the upper
/// case letter, so `"Shift+g"` and `"G"` are the same binding. Terminals
/// report shift inconsistently for symbols like `?`, so shift is only compared
/// for non-character keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    key: Key,
    ctrl: bool,
    alt: bool,
    shift: bool,
}

impl KeyBinding {
    pub fn parse(binding: &str) -> Result<Self> {
        let mut ctrl = false;
        let mut alt = false;
        let mut shift = false;
        let mut name = None;

        for part in binding.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "alt" => alt = true,
                "shift" => shift = true,
                _ if name.is_none() && !part.is_empty() => name = Some(part),
                _ => return Err(Error::invalid_input(format!("bad key binding: {binding:?}"))),
            }
        }

        // A lone "+" splits into two empty parts.
        let name = match (name, binding) {
            (Some(name), _) => name,
            (None, "+") => "+",
            (None, _) => return Err(Error::invalid_input(format!("bad key binding: {binding:?}"))),
        };

        let key = match name.to_lowercase().as_str() {
            "enter" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            "backspace" => Key::Backspace,
            "tab" => Key::Tab,
            "backtab" => Key::BackTab,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "space" => Key::Char(' '),
            lower if lower.len() > 1 && lower.starts_with('f') => lower[1..]
                .parse::<u8>()
                .map(Key::F)
                .map_err(|_| Error::invalid_input(format!("bad key binding: {binding:?}")))?,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if shift => Key::Char(c.to_ascii_uppercase()),
                    (Some(c), None) => Key::Char(c),
                    _ => {
                        return Err(Error::invalid_input(format!(
                            "unknown key {name:?} in binding {binding:?}"
                        )));
                    }
                }
            }
        };

        Ok(Self {
            key,
            ctrl,
            alt,
            shift,
        })
    }

    pub fn matches(&self, input: &InputEvent) -> bool {
        if input.key != self.key
            || input.modifiers.ctrl != self.ctrl
            || input.modifiers.alt != self.alt
        {
            return false;
        }
        matches!(self.key, Key::Char(_)) || input.modifiers.shift == self.shift
    }
}
