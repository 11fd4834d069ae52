//! Normalized input events
//!
//! Hosts translate their windowing events into these before handing them to
//! a session. The serde form is what the headless runner replays, e.g.
//! `{"type": "key_down", "key": "z", "modifiers": {"ctrl": true}}`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Quit,
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    MouseButtonDown {
        pos: Vec2,
        button: MouseButton,
    },
    MouseButtonUp {
        pos: Vec2,
        button: MouseButton,
    },
    MouseMove {
        pos: Vec2,
        #[serde(default)]
        held: HeldButtons,
    },
}

/// Keys the panel reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    A,
    L,
    P,
    R,
    S,
    T,
    Y,
    Z,
    Plus,
    Minus,
    PageUp,
    PageDown,
    Delete,
    Backspace,
    Escape,
    /// Anything else; ignored
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Buttons held during a mouse move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeldButtons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl HeldButtons {
    pub const LEFT: Self = Self {
        left: true,
        middle: false,
        right: false,
    };

    pub fn is_held(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
        }
    }
}

impl InputEvent {
    pub fn key(key: Key) -> Self {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::CTRL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_event_stream() {
        let json = r#"[
            {"type": "mouse_button_down", "pos": [10.0, 20.0], "button": "left"},
            {"type": "mouse_move", "pos": [15.0, 20.0], "held": {"left": true}},
            {"type": "key_down", "key": "z", "modifiers": {"ctrl": true}},
            {"type": "key_down", "key": "page_up"},
            {"type": "key_down", "key": "f12"},
            {"type": "quit"}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(
            events,
            vec![
                InputEvent::MouseButtonDown {
                    pos: Vec2::new(10.0, 20.0),
                    button: MouseButton::Left,
                },
                InputEvent::MouseMove {
                    pos: Vec2::new(15.0, 20.0),
                    held: HeldButtons::LEFT,
                },
                InputEvent::ctrl(Key::Z),
                InputEvent::key(Key::PageUp),
                InputEvent::key(Key::Other),
                InputEvent::Quit,
            ]
        );
    }

    #[test]
    fn test_held_buttons() {
        assert!(HeldButtons::LEFT.is_held(MouseButton::Left));
        assert!(!HeldButtons::LEFT.is_held(MouseButton::Right));
        assert!(!HeldButtons::default().is_held(MouseButton::Left));
    }
}
